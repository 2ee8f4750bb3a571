//! 本地文件读取
//!
//! 从 `<input type=file>` 或拖放事件中取出文件，读成 `FileUpload` 交给核心库上传。

use leptos::ev::Event;
use leptos::prelude::event_target;
use manhaj::request::FileUpload;
use manhaj::{ClientError, ClientResult, log_warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, HtmlInputElement, Url};

/// 文件输入框当前选中的第一个文件
pub fn selected_file(ev: &Event) -> Option<File> {
    event_target::<HtmlInputElement>(ev).files()?.get(0)
}

/// 拖放事件携带的第一个文件
pub fn dropped_file(ev: &DragEvent) -> Option<File> {
    ev.data_transfer()?.files()?.get(0)
}

pub fn is_image(file: &File) -> bool {
    file.type_().starts_with("image/")
}

/// 读取失败属于本地错误，不会发出请求
pub async fn read_upload(file: &File) -> ClientResult<FileUpload> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(|e| {
        log_warn!("[File] could not read {}: {:?}", file.name(), e);
        ClientError::validation("error.file_read")
    })?;
    Ok(FileUpload {
        name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

/// 本地预览地址，用完需要 `revoke_preview`
pub fn preview_url(file: &File) -> Option<String> {
    Url::create_object_url_with_blob(file).ok()
}

pub fn revoke_preview(url: &str) {
    let _ = Url::revoke_object_url(url);
}
