//! 界面语言上下文
//!
//! 当前语言保存在 LocalStorage，切换时同步 `<html lang dir>`。
//! 平台显示名称在启动时获取一次。

use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::i18n::translate;
use manhaj::storage::KeyValueStore;
use manhaj::{log_warn, ClientError};
use manhaj_shared::{Language, PlatformSettings, STORAGE_LANGUAGE_KEY};

use crate::context::Api;
use crate::web::BrowserStorage;

#[derive(Clone, Copy)]
pub struct LocaleContext {
    pub language: RwSignal<Language>,
    pub platform: RwSignal<PlatformSettings>,
}

impl LocaleContext {
    /// 优先使用上次保存的语言
    pub fn new(default_language: Language) -> Self {
        let saved = BrowserStorage
            .get(STORAGE_LANGUAGE_KEY)
            .and_then(|code| Language::from_code(&code));
        Self {
            language: RwSignal::new(saved.unwrap_or(default_language)),
            platform: RwSignal::new(PlatformSettings::default()),
        }
    }

    /// 响应式翻译
    pub fn t(&self, key: &str) -> String {
        translate(self.language.get(), key).to_string()
    }

    pub fn current(&self) -> Language {
        self.language.get()
    }

    pub fn is_rtl(&self) -> bool {
        self.language.get().is_rtl()
    }

    pub fn set_language(&self, language: Language) {
        if let Err(e) = BrowserStorage.set(STORAGE_LANGUAGE_KEY, language.code()) {
            log_warn!("[Locale] Could not persist language: {}", e);
        }
        self.language.set(language);
    }

    pub fn toggle(&self) {
        self.set_language(self.language.get_untracked().toggle());
    }

    /// 平台名称；未加载时使用内置标题
    pub fn platform_name(&self) -> String {
        let language = self.language.get();
        self.platform.with(|settings| {
            let name = settings.display_name(language);
            if name.is_empty() {
                translate(language, "app.title").to_string()
            } else {
                name.to_string()
            }
        })
    }

    /// 错误横幅文本
    pub fn error_text(&self, err: &ClientError) -> String {
        err.user_message(self.language.get_untracked())
    }
}

fn apply_document_language(language: Language) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = root.set_attribute("lang", language.code());
    let _ = root.set_attribute("dir", language.direction().as_str());
}

/// 同步文档方向并加载平台名称
pub fn init_locale(locale: LocaleContext, api: Api) {
    Effect::new(move |_| apply_document_language(locale.language.get()));

    spawn_local(async move {
        match api.platform_settings().await {
            Ok(settings) => locale.platform.set(settings),
            Err(e) => log_warn!("[Locale] Platform settings unavailable: {}", e),
        }
    });
}
