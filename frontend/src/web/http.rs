//! 浏览器 HTTP 传输层
//!
//! 基于 `gloo-net` 实现核心库的 `HttpClient`。所有请求都携带 Cookie
//! （`credentials: include`），会话由服务器的 session cookie 维持。

use gloo_net::http::{Request, RequestBuilder};
use manhaj::request::{FileUpload, FormPart, HttpMethod, RequestBody};
use manhaj::{ClientError, ClientResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData, RequestCredentials};

fn js_error(context: &str, err: JsValue) -> ClientError {
    ClientError::network(format!("{}: {:?}", context, err))
}

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Patch => Request::patch(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

fn to_blob(file: &FileUpload) -> ClientResult<Blob> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&file.content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("创建 Blob 失败", e))
}

/// multipart 字段转换为 `FormData`，Content-Type 由浏览器补上 boundary
fn to_form_data(parts: &[FormPart]) -> ClientResult<FormData> {
    let form = FormData::new().map_err(|e| js_error("创建 FormData 失败", e))?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form
                .append_with_str(name, value)
                .map_err(|e| js_error("写入表单字段失败", e))?,
            FormPart::File { name, file } => form
                .append_with_blob_and_filename(name, &to_blob(file)?, &file.name)
                .map_err(|e| js_error("写入文件字段失败", e))?,
        }
    }
    Ok(form)
}

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for WebHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder =
            builder(req.method, &req.url).credentials(RequestCredentials::Include);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match &req.body {
            None => builder.build(),
            Some(RequestBody::Json(text)) => builder.body(text.as_str()),
            Some(RequestBody::Multipart(parts)) => builder.body(to_form_data(parts)?),
        }
        .map_err(|e| ClientError::network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
