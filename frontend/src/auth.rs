//! 认证模块
//!
//! 管理当前登录用户，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use leptos::prelude::*;
use manhaj::{log_info, log_warn, ClientErrorKind, ClientResult};
use manhaj_shared::User;

use crate::context::Api;

/// 会话上下文
///
/// `is_loading` 在启动时的会话检查完成前为 true。
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub user: RwSignal<Option<User>>,
    pub is_loading: RwSignal<bool>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            is_loading: RwSignal::new(true),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let user = self.user;
        Signal::derive(move || user.with(Option::is_some))
    }

    /// 会话检查是否完成
    pub fn is_ready_signal(&self) -> Signal<bool> {
        let is_loading = self.is_loading;
        Signal::derive(move || !is_loading.get())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 启动时检查会话；401/403 视为未登录
pub async fn check_session(ctx: SessionContext, api: &Api) {
    match api.current_user().await {
        Ok(user) => {
            log_info!("[Session] Signed in as {}", user.email);
            ctx.user.set(Some(user));
        }
        Err(e) if e.kind == ClientErrorKind::Unauthorized => ctx.user.set(None),
        Err(e) => {
            log_warn!("[Session] Session check failed: {}", e);
            ctx.user.set(None);
        }
    }
    ctx.is_loading.set(false);
}

/// 登录
///
/// 导航将由路由服务的认证状态监听自动处理。
pub async fn login(ctx: SessionContext, api: &Api, email: &str, password: &str) -> ClientResult<()> {
    let user = api.login(email, password).await?;
    log_info!("[Session] Signed in as {}", user.email);
    ctx.user.set(Some(user));
    Ok(())
}

/// 注销；请求失败也清除本地会话
pub async fn logout(ctx: SessionContext, api: &Api) {
    if let Err(e) = api.logout().await {
        log_warn!("[Session] Logout request failed: {}", e);
    }
    ctx.user.set(None);
}

/// 资料修改后重新获取当前用户
pub async fn refresh_user(ctx: SessionContext, api: &Api) {
    match api.current_user().await {
        Ok(user) => ctx.user.set(Some(user)),
        Err(e) => log_warn!("[Session] Could not refresh user: {}", e),
    }
}
