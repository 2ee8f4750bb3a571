//! 运行时配置
//!
//! 所有配置都有默认值，可在构建时通过环境变量覆盖：
//!
//! ```text
//! MANHAJ_API_BASE=https://api.example.com trunk build --release
//! ```

use std::time::Duration;

use manhaj_shared::Language;

// =========================================================
// 常量定义
// =========================================================

/// 空字符串表示与页面同源
const DEFAULT_API_BASE: &str = "";
const DEFAULT_LANGUAGE: &str = "ar";
const DEFAULT_CAPTURE_POLL_MS: u64 = 500;
const DEFAULT_TOAST_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub default_language: Language,
    /// 录屏检测的轮询间隔
    pub capture_poll: Duration,
    /// 提示框自动消失时间
    pub toast_duration: Duration,
}

fn millis(value: Option<&str>, default: u64) -> Duration {
    Duration::from_millis(
        value
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(default),
    )
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("MANHAJ_API_BASE"),
            option_env!("MANHAJ_DEFAULT_LANGUAGE"),
            option_env!("MANHAJ_CAPTURE_POLL_MS"),
            option_env!("MANHAJ_TOAST_MS"),
        )
    }

    fn from_values(
        api_base: Option<&str>,
        language: Option<&str>,
        capture_poll_ms: Option<&str>,
        toast_ms: Option<&str>,
    ) -> Self {
        Self {
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            default_language: language
                .and_then(Language::from_code)
                .or_else(|| Language::from_code(DEFAULT_LANGUAGE))
                .unwrap_or_default(),
            capture_poll: millis(capture_poll_ms, DEFAULT_CAPTURE_POLL_MS),
            toast_duration: millis(toast_ms, DEFAULT_TOAST_MS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "");
        assert_eq!(config.default_language, Language::Ar);
        assert_eq!(config.capture_poll, Duration::from_millis(500));
        assert_eq!(config.toast_duration, Duration::from_millis(3000));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config =
            AppConfig::from_values(Some("https://api.test/"), Some("en"), Some("0"), Some("abc"));
        assert_eq!(config.api_base, "https://api.test");
        assert_eq!(config.default_language, Language::En);
        assert_eq!(config.capture_poll, Duration::from_millis(500));
        assert_eq!(config.toast_duration, Duration::from_millis(3000));
    }
}
