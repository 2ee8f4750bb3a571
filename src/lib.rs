//! Manhaj 客户端核心
//!
//! 与 UI 框架无关的逻辑层，前端组件只负责渲染与事件转发：
//! - `request`: HTTP 抽象（`HttpClient` trait 及测试用 Mock）
//! - `api`: 类型化 API 客户端与 CSRF 令牌缓存
//! - `error`: 统一错误类型 `ClientError`
//! - `structure` / `reorder` / `optimistic`: 课程结构编辑、拖拽排序与乐观更新策略
//! - `playback`: 播放序列展开与进度持久化
//! - `forms`: 表单草稿与校验
//! - `i18n`: 文案查表
//! - `capture`: 屏幕录制流追踪

// =========================================================
// 跨平台日志宏
// =========================================================

/// wasm32 下写入浏览器控制台，原生平台（测试）下写入标准输出
#[doc(hidden)]
pub mod logging {
    #[cfg(target_arch = "wasm32")]
    pub fn info(message: &str) {
        web_sys::console::log_1(&message.into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn info(message: &str) {
        println!("{}", message);
    }

    #[cfg(target_arch = "wasm32")]
    pub fn warn(message: &str) {
        web_sys::console::warn_1(&message.into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn warn(message: &str) {
        eprintln!("{}", message);
    }

    #[cfg(target_arch = "wasm32")]
    pub fn error(message: &str) {
        web_sys::console::error_1(&message.into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn error(message: &str) {
        eprintln!("{}", message);
    }
}

#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::logging::info(&format!($($t)*)))
}

#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::logging::warn(&format!($($t)*)))
}

#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::logging::error(&format!($($t)*)))
}

pub mod api;
pub mod capture;
pub mod error;
pub mod forms;
pub mod i18n;
pub mod optimistic;
pub mod playback;
pub mod reorder;
pub mod request;
pub mod storage;
pub mod structure;

pub use api::ApiClient;
pub use error::{ClientError, ClientErrorKind, ClientResult};
pub use request::{HttpClient, HttpRequest, HttpResponse};
