//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。
//!
//! 会话检查完成之前（`is_ready` 为 false）不执行守卫，
//! 避免刷新受保护页面时被误判为未登录。

use leptos::prelude::*;
use manhaj::log_info;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 会话检查是否已完成
    is_ready: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, is_ready: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            is_ready,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 守卫：返回实际应进入的路由
    fn guard(&self, target: AppRoute) -> AppRoute {
        if !self.is_ready.get_untracked() {
            return target;
        }
        let is_auth = self.is_authenticated.get_untracked();
        if target.requires_auth() && !is_auth {
            log_info!("[Router] Access to {} denied. Redirecting to login.", target);
            AppRoute::auth_failure_redirect()
        } else if target.should_redirect_when_authenticated() && is_auth {
            log_info!("[Router] Already authenticated. Redirecting to courses.");
            AppRoute::auth_success_redirect()
        } else {
            target
        }
    }

    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let route = self.guard(target_route);
        if use_push {
            push_history_state(&route.to_path());
        } else {
            replace_history_state(&route.to_path());
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            let route = router.guard(target_route);
            if route != target_route {
                replace_history_state(&route.to_path());
            }
            router.set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话检查完成或认证状态变化时重新执行守卫
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_ready = router.is_ready.get();
            let is_auth = router.is_authenticated.get();
            if !is_ready {
                return;
            }
            let route = router.current_route.get_untracked();
            let guarded = router.guard(route);
            if guarded != route {
                log_info!(
                    "[Router] Auth state changed (signed in: {}), redirecting to {}.",
                    is_auth,
                    guarded
                );
                replace_history_state(&guarded.to_path());
                router.set_route.set(guarded);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, is_ready: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, is_ready);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 会话检查完成信号
    is_ready: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, is_ready);

    children()
}

/// 路由出口组件
///
/// 会话检查完成前显示加载动画，之后根据当前路由渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    is_ready: Signal<bool>,
) -> impl IntoView {
    let router = use_router();

    move || {
        if !is_ready.get() {
            return view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(router.current_route().get())
    }
}

/// 站内链接：拦截点击，通过 History API 导航
#[component]
pub fn Link(
    route: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.go(route);
    };

    view! {
        <a href=route.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
