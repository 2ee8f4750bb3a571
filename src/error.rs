use std::fmt;

use manhaj_shared::Language;
use serde_json::Value;

use crate::i18n::translate;

// =========================================================
// 错误分类
// =========================================================

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// 请求未能到达服务器（fetch 抛出异常）
    Network,
    /// 服务器返回非 2xx 状态
    Server,
    /// 本地表单校验失败，请求尚未发出
    Validation,
    /// 响应体无法解析为预期类型
    Decode,
    /// 401 / 403：会话失效或无权限
    Unauthorized,
    /// 本地存储不可用或写入失败
    Storage,
}

impl ClientErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorKind::Network => "NETWORK_ERROR",
            ClientErrorKind::Server => "SERVER_ERROR",
            ClientErrorKind::Validation => "VALIDATION_ERROR",
            ClientErrorKind::Decode => "DECODE_ERROR",
            ClientErrorKind::Unauthorized => "UNAUTHORIZED",
            ClientErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - kind: 错误分类
/// - message: 面向用户的消息；校验错误时为文案键
/// - status: 服务器返回的 HTTP 状态码（如有）
/// - source: 原始错误（仅调试用）
/// - ops: 发生错误时的操作链，如 `api.reorder`
#[derive(Debug)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ops: Vec<String>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
            ops: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(ClientErrorKind::Server, message);
        err.status = Some(status);
        err
    }

    /// `key` 是 i18n 文案键，显示时再翻译
    pub fn validation(key: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Validation, key)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Storage, message)
    }

    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(ClientErrorKind::Unauthorized, message);
        err.status = Some(status);
        err
    }

    /// 由非 2xx 响应构造错误，从 JSON 响应体中提取服务器给出的说明
    pub fn from_response(status: u16, body: &str) -> Self {
        let message =
            extract_server_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        match status {
            401 | 403 => Self::unauthorized(status, message),
            _ => Self::server(status, message),
        }
    }

    // --- Context builders ---

    /// 记录错误发生时所在的操作
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.ops.push(operation.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    /// 服务器以 CSRF 校验失败拒绝了请求
    pub fn is_csrf_failure(&self) -> bool {
        self.status == Some(403) && self.message.to_ascii_uppercase().contains("CSRF")
    }

    /// 横幅中显示的文本
    pub fn user_message(&self, language: Language) -> String {
        match self.kind {
            ClientErrorKind::Validation => translate(language, &self.message).to_string(),
            ClientErrorKind::Network => translate(language, "error.network").to_string(),
            ClientErrorKind::Decode | ClientErrorKind::Storage => {
                translate(language, "error.generic").to_string()
            }
            ClientErrorKind::Unauthorized if self.status == Some(401) => {
                translate(language, "error.unauthorized").to_string()
            }
            ClientErrorKind::Server | ClientErrorKind::Unauthorized => self.message.clone(),
        }
    }
}

/// 依次尝试 `detail`、`error`、`message`，再退回第一个字段级错误列表
fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "error", "message"] {
        if let Some(text) = object.get(key).and_then(first_text) {
            return Some(text);
        }
    }

    object.iter().find_map(|(field, value)| {
        first_text(value).map(|text| {
            if field == "non_field_errors" {
                text
            } else {
                format!("{}: {}", field, text)
            }
        })
    })
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        if !self.ops.is_empty() {
            write!(f, " | trace: {}", self.ops.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string()).with_source(e)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_prefers_detail() {
        let err = ClientError::from_response(400, r#"{"detail":"Chapter not found"}"#);
        assert_eq!(err.kind, ClientErrorKind::Server);
        assert_eq!(err.message(), "Chapter not found");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_server_message_from_field_errors() {
        let err = ClientError::from_response(400, r#"{"title":["This field may not be blank."]}"#);
        assert_eq!(err.message(), "title: This field may not be blank.");

        let err = ClientError::from_response(400, r#"{"non_field_errors":["Duplicate price"]}"#);
        assert_eq!(err.message(), "Duplicate price");
    }

    #[test]
    fn test_server_message_falls_back_to_status() {
        let err = ClientError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message(), "HTTP 502");
        assert_eq!(err.to_string(), "[SERVER_ERROR] HTTP 502 (HTTP 502)");
    }

    #[test]
    fn test_forbidden_csrf_is_detected() {
        let err = ClientError::from_response(
            403,
            r#"{"detail":"CSRF Failed: CSRF token missing."}"#,
        );
        assert_eq!(err.kind, ClientErrorKind::Unauthorized);
        assert!(err.is_csrf_failure());
        assert!(!ClientError::from_response(403, "{}").is_csrf_failure());
    }

    #[test]
    fn test_user_message_translates_validation_keys() {
        let err = ClientError::validation("validation.title_required");
        assert_eq!(err.user_message(Language::En), "Title is required");
        assert_eq!(err.user_message(Language::Ar), "العنوان مطلوب");

        let err = ClientError::network("Failed to fetch").in_op("api.send");
        assert_eq!(
            err.user_message(Language::En),
            "Network error. Check your connection and try again."
        );
        assert_eq!(err.ops(), ["api.send".to_string()]);
    }

    #[test]
    fn test_file_read_failure_is_not_reported_as_network() {
        let err = ClientError::validation("error.file_read");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.user_message(Language::En), "The selected file could not be read.");
        assert_eq!(err.user_message(Language::Ar), "تعذرت قراءة الملف المحدد.");
    }
}
