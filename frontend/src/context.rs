//! 应用上下文
//!
//! 在 `App` 中创建一次，通过 Leptos Context 提供给所有组件：
//! API 客户端、会话、界面语言与提示框。

use leptos::prelude::*;
use manhaj::{ApiClient, ClientError};

use crate::auth::SessionContext;
use crate::config::AppConfig;
use crate::i18n::LocaleContext;
use crate::web::WebHttpClient;

pub type Api = ApiClient<WebHttpClient>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
    pub is_error: bool,
}

/// 提示框队列（同一时间只显示最新一条）
#[derive(Clone, Copy)]
pub struct ToastContext {
    pub current: RwSignal<Option<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            next_id: StoredValue::new(0),
        }
    }

    fn push(&self, text: String, is_error: bool) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.current.set(Some(Toast { id, text, is_error }));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(text.into(), true);
    }

    /// 只关闭指定的提示，避免旧定时器关掉新提示
    pub fn dismiss(&self, id: u64) {
        if self.current.with_untracked(|t| t.as_ref().is_some_and(|t| t.id == id)) {
            self.current.set(None);
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub api: Api,
    pub session: SessionContext,
    pub locale: LocaleContext,
    pub toast: ToastContext,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let api = ApiClient::new(WebHttpClient, config.api_base.clone());
        let locale = LocaleContext::new(config.default_language);
        Self {
            config,
            api,
            session: SessionContext::new(),
            locale,
            toast: ToastContext::new(),
        }
    }

    /// 以当前语言显示错误
    pub fn report(&self, err: &ClientError) {
        self.toast.error(self.locale.error_text(err));
    }
}

pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
