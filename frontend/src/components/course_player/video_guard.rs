use leptos::ev::{Event, MouseEvent};
use leptos::prelude::*;
use manhaj::capture::CaptureTracker;

use crate::context::use_app;
use crate::web::capture::{BrowserStream, CaptureHook};
use crate::web::timer;

/// 带录屏保护的视频播放器
///
/// 页面上任何代码发起的录屏请求成功后立即暂停，录制期间拦截 `play`、
/// `playing` 与 `canplay`。轨道结束事件与定时轮询都会刷新录制状态。
#[component]
pub fn GuardedVideo(src: String) -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let recording = RwSignal::new(false);
    let tracker = StoredValue::new_local(CaptureTracker::<BrowserStream>::new());

    let pause = move || {
        if let Some(video) = video_ref.try_get_untracked().flatten() {
            let _ = video.pause();
        }
    };

    let refresh = move || {
        let stopped = tracker.try_update_value(|t| t.refresh()).unwrap_or(false);
        if stopped {
            recording.try_set(false);
        } else if recording.try_get_untracked().unwrap_or(false) {
            pause();
        }
    };

    let hook = CaptureHook::install(
        move |stream| {
            if tracker.try_update_value(|t| t.add(stream)).unwrap_or(false) {
                recording.try_set(true);
            }
            pause();
        },
        refresh,
    );
    let poll = timer::every(app.config.capture_poll, refresh);
    let handles = StoredValue::new_local(Some((hook, poll)));

    on_cleanup(move || {
        // 恢复 getDisplayMedia 并停止轮询
        handles.try_update_value(|h| drop(h.take()));
        tracker.try_update_value(CaptureTracker::clear);
    });

    let hold = move |_: Event| {
        if recording.get_untracked() {
            pause();
        }
    };

    view! {
        <div class="relative w-full overflow-hidden rounded-box bg-black">
            <video
                node_ref=video_ref
                src=src
                controls=true
                controlslist="nodownload"
                disablepictureinpicture=true
                playsinline=true
                class="w-full aspect-video"
                on:play=hold
                on:playing=hold
                on:canplay=hold
                on:contextmenu=move |ev: MouseEvent| ev.prevent_default()
            ></video>
            <Show when=move || recording.get()>
                <div class="absolute inset-0 flex items-center justify-center bg-black/90 p-6 text-center">
                    <p class="text-lg font-semibold text-error">{move || locale.t("player.recording")}</p>
                </div>
            </Show>
        </div>
    }
}
