use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub use manhaj_shared::HttpMethod;

use crate::error::{ClientError, ClientResult};

#[cfg(test)]
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 待上传的文件
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// multipart 表单字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn file(name: &str, file: FileUpload) -> Self {
        FormPart::File {
            name: name.to_string(),
            file,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body.to_string()));
        self
    }

    /// multipart 请求不设置 Content-Type，由浏览器补上 boundary
    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 空响应体（如 204）按 `null` 解析；只需确认成功的端点用 `Ack` 作为响应类型
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(ClientError::from)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Clone)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

/// 按 (Method, URL) 返回预设响应
///
/// 同一个键可以排队多个响应，依次弹出；最后一个响应会被重复使用。
#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<(String, String), VecDeque<MockReply>>>,
    // 为 true 时每次回复前让出一次执行权，用于模拟并发请求交错
    yield_replies: Cell<bool>,
    // 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, String, HashMap<String, String>, Option<RequestBody>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            yield_replies: Cell::new(false),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, method: HttpMethod, url: &str, reply: MockReply) {
        self.responses
            .borrow_mut()
            .entry((method.as_str().to_string(), url.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.push(method, url, MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_empty(&self, method: HttpMethod, url: &str, status: u16) {
        self.push(method, url, MockReply::Respond(status, String::new()));
    }

    /// 模拟 fetch 抛出异常
    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.push(method, url, MockReply::Fail("Failed to fetch".to_string()));
    }

    /// 回复前先挂起一次，让同时发出的请求真正交错
    pub fn yield_before_reply(&self) {
        self.yield_replies.set(true);
    }

    /// 已记录请求的 "METHOD URL" 列表
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, method, _, _)| format!("{} {}", method, url))
            .collect()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = req.method.as_str().to_string();
        self.requests.borrow_mut().push((
            req.url.clone(),
            method.clone(),
            req.headers.clone(),
            req.body.clone(),
        ));
        if self.yield_replies.get() {
            tokio::task::yield_now().await;
        }

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&(method, req.url.clone())) else {
            return Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            });
        };

        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match reply {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail(message)) => Err(ClientError::network(message)),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_accepts_empty_and_json_bodies() {
        use manhaj_shared::Ack;

        for body in ["", "null", r#"{"detail":"deleted"}"#, r#"{"status":"reordered"}"#] {
            let resp = HttpResponse {
                status: 200,
                body: body.to_string(),
            };
            assert_eq!(resp.json::<Ack>().unwrap(), Ack, "body: {:?}", body);
        }
    }

    #[test]
    fn test_invalid_body_is_decode_error() {
        let resp = HttpResponse {
            status: 200,
            body: "<html>".to_string(),
        };
        let err = resp.json::<Vec<u64>>().unwrap_err();
        assert_eq!(err.kind, crate::ClientErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_mock_queue_replays_last_response() {
        let client = MockHttpClient::new();
        client.mock_network_error(HttpMethod::Get, "http://x/a");
        client.mock_response(HttpMethod::Get, "http://x/a", 200, serde_json::json!([1]));

        let first = client.send(HttpRequest::new("http://x/a", HttpMethod::Get)).await;
        assert!(first.is_err());
        for _ in 0..2 {
            let resp = client
                .send(HttpRequest::new("http://x/a", HttpMethod::Get))
                .await
                .unwrap();
            assert_eq!(resp.json::<Vec<u64>>().unwrap(), vec![1]);
        }

        // 方法不同视为未注册
        let resp = client
            .send(HttpRequest::new("http://x/a", HttpMethod::Post))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(client.calls().len(), 4);
    }
}
