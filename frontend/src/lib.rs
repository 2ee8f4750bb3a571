//! Manhaj 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `context`: 应用上下文（API 客户端、会话、语言、提示框）
//! - `components`: UI 组件层
//!
//! 业务逻辑（排序、乐观更新、播放进度、表单校验）位于 `manhaj` 核心库，
//! 组件只负责渲染与事件转发。

mod auth;
mod config;
mod context;
mod i18n;
mod components {
    pub mod confirm_dialog;
    pub mod course_editor;
    pub mod course_player;
    pub mod courses;
    pub mod guarded_modal;
    pub mod icons;
    pub mod layout;
    pub mod login;
    pub mod payments;
    pub mod pricing;
    pub mod profile;
    pub mod toast;
}

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::check_session;
use crate::components::course_editor::CourseEditorPage;
use crate::components::course_player::CoursePlayerPage;
use crate::components::courses::CoursesPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::payments::PaymentsPage;
use crate::components::pricing::PricingPage;
use crate::components::profile::ProfilePage;
use crate::components::toast::Toaster;
use crate::config::AppConfig;
use crate::context::{AppContext, use_app};
use crate::i18n::init_locale;

// 浏览器 API 适配层
// gloo-* 系列实现核心库的传输与存储接口，History API 路由自行封装。
pub(crate) mod web {
    pub mod capture;
    pub mod file;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    pub mod timer;

    pub use http::WebHttpClient;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

#[component]
fn NotFoundPage() -> impl IntoView {
    let locale = use_app().locale;
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">{move || locale.t("notfound.title")}</p>
                <Link route=AppRoute::Courses class="btn btn-link mt-4">
                    {move || locale.t("nav.courses")}
                </Link>
            </div>
        </div>
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Courses => view! { <Layout><CoursesPage /></Layout> }.into_any(),
        AppRoute::CourseEditor(course_id) => {
            view! { <Layout><CourseEditorPage course_id=course_id /></Layout> }.into_any()
        }
        AppRoute::CoursePlayer(course_id) => {
            view! { <Layout><CoursePlayerPage course_id=course_id /></Layout> }.into_any()
        }
        AppRoute::Profile => view! { <Layout><ProfilePage /></Layout> }.into_any(),
        AppRoute::Pricing => view! { <Layout><PricingPage /></Layout> }.into_any(),
        AppRoute::Payments => view! { <Layout><PaymentsPage /></Layout> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建应用上下文
    let app = AppContext::new(AppConfig::from_build_env());
    provide_context(app.clone());

    // 2. 语言方向与平台名称
    init_locale(app.locale, app.api.clone());

    // 3. 检查会话
    let session = app.session;
    let api = app.api.clone();
    spawn_local(async move { check_session(session, &api).await });

    // 4. 认证信号注入路由服务
    let is_authenticated = session.is_authenticated_signal();
    let is_ready = session.is_ready_signal();

    view! {
        <Router is_authenticated=is_authenticated is_ready=is_ready>
            <RouterOutlet matcher=route_matcher is_ready=is_ready />
        </Router>
        <Toaster />
    }
}
