//! 屏幕录制探测
//!
//! 替换 `navigator.mediaDevices.getDisplayMedia`，页面内发起的每一次录屏请求
//! 在成功后都会把 `MediaStream` 交给回调。卸载时恢复原函数。

use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use manhaj::capture::CaptureStream;
use manhaj::log_warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{MediaDevices, MediaStream, MediaStreamTrack, MediaStreamTrackState};

const DISPLAY_MEDIA: &str = "getDisplayMedia";

fn tracks(stream: &MediaStream) -> impl Iterator<Item = MediaStreamTrack> {
    stream
        .get_tracks()
        .into_iter()
        .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
}

/// 浏览器录屏流：任意一条轨道仍为 live 即视为在录
///
/// 每条轨道的 `ended` 事件都会通知回调。
pub struct BrowserStream {
    stream: MediaStream,
    _on_ended: Closure<dyn Fn()>,
}

impl BrowserStream {
    fn watch(stream: MediaStream, on_ended: Rc<dyn Fn()>) -> Self {
        let listener = Closure::<dyn Fn()>::new(move || {
            // 回调里会释放已结束的流（连同本监听器），推迟到下一个微任务
            let on_ended = Rc::clone(&on_ended);
            spawn_local(async move { on_ended() });
        });
        for track in tracks(&stream) {
            track.set_onended(Some(listener.as_ref().unchecked_ref()));
        }
        Self {
            stream,
            _on_ended: listener,
        }
    }
}

impl CaptureStream for BrowserStream {
    fn is_live(&self) -> bool {
        tracks(&self.stream).any(|t| t.ready_state() == MediaStreamTrackState::Live)
    }
}

impl Drop for BrowserStream {
    fn drop(&mut self) {
        for track in tracks(&self.stream) {
            track.set_onended(None);
        }
    }
}

/// 已安装的 `getDisplayMedia` 钩子，drop 时恢复
pub struct CaptureHook {
    devices: MediaDevices,
    original: Function,
    _wrapper: Closure<dyn FnMut(JsValue) -> JsValue>,
}

impl CaptureHook {
    /// 浏览器不支持录屏 API 时返回 `None`
    pub fn install(
        on_stream: impl Fn(BrowserStream) + 'static,
        on_track_ended: impl Fn() + 'static,
    ) -> Option<Self> {
        let devices = web_sys::window()?.navigator().media_devices().ok()?;
        let original = Reflect::get(&devices, &JsValue::from_str(DISPLAY_MEDIA))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;

        let on_stream = Rc::new(on_stream);
        let on_track_ended: Rc<dyn Fn()> = Rc::new(on_track_ended);
        let wrapper = {
            let devices = devices.clone();
            let original = original.clone();
            Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |constraints: JsValue| {
                let promise = match original
                    .call1(&devices, &constraints)
                    .and_then(|p| p.dyn_into::<Promise>())
                {
                    Ok(promise) => promise,
                    Err(e) => return Promise::reject(&e).into(),
                };
                // 旁路等待同一个 Promise，调用方拿到的结果不受影响
                let observed = promise.clone();
                let on_stream = Rc::clone(&on_stream);
                let on_track_ended = Rc::clone(&on_track_ended);
                spawn_local(async move {
                    if let Ok(stream) = JsFuture::from(observed).await {
                        if let Ok(media) = stream.dyn_into::<MediaStream>() {
                            on_stream(BrowserStream::watch(media, on_track_ended));
                        }
                    }
                });
                promise.into()
            })
        };

        if let Err(e) = Reflect::set(&devices, &JsValue::from_str(DISPLAY_MEDIA), wrapper.as_ref()) {
            log_warn!("[CaptureGuard] Could not hook {}: {:?}", DISPLAY_MEDIA, e);
            return None;
        }

        Some(Self {
            devices,
            original,
            _wrapper: wrapper,
        })
    }
}

impl Drop for CaptureHook {
    fn drop(&mut self) {
        let _ = Reflect::set(
            &self.devices,
            &JsValue::from_str(DISPLAY_MEDIA),
            &self.original,
        );
    }
}
