//! 定时器封装
//!
//! 对 `gloo-timers` 的薄封装：组件卸载时 drop 句柄即可取消。

use std::time::Duration;

pub use gloo_timers::callback::{Interval, Timeout};

/// 周期性任务，drop 时清除
pub fn every<F>(period: Duration, callback: F) -> Interval
where
    F: FnMut() + 'static,
{
    Interval::new(period.as_millis() as u32, callback)
}

/// 延迟任务，drop 时取消
pub fn after<F>(delay: Duration, callback: F) -> Timeout
where
    F: FnOnce() + 'static,
{
    Timeout::new(delay.as_millis() as u32, callback)
}
