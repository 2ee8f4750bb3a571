use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::logout;
use crate::components::icons::{ArrowRightOnRectangle, BookOpen, Language};
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 已登录页面的外框：顶部导航栏 + 内容区
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let session = app.session;
    let router = use_router();

    let is_teacher = move || session.user.with(|u| u.as_ref().is_some_and(|u| u.is_teacher()));
    let user_name = move || {
        session
            .user
            .with(|u| u.as_ref().map(|u| u.display_name()).unwrap_or_default())
    };

    // 路由切换时整个 Layout 会重建，这里无需追踪
    let link_class = move |route: AppRoute| {
        if router.current_route().get_untracked() == route {
            "btn btn-ghost btn-sm btn-active"
        } else {
            "btn btn-ghost btn-sm"
        }
    };

    let on_logout = {
        let api = app.api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move { logout(session, &api).await });
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <BookOpen attr:class="text-primary h-6 w-6" />
                        <Link route=AppRoute::Courses class="btn btn-ghost text-xl">
                            {move || locale.platform_name()}
                        </Link>
                    </div>
                    <div class="flex-none gap-2 flex-wrap">
                        <Link route=AppRoute::Courses class=link_class(AppRoute::Courses)>
                            {move || locale.t("nav.courses")}
                        </Link>
                        <Show when=is_teacher>
                            <Link route=AppRoute::Pricing class=link_class(AppRoute::Pricing)>
                                {move || locale.t("nav.pricing")}
                            </Link>
                            <Link route=AppRoute::Payments class=link_class(AppRoute::Payments)>
                                {move || locale.t("nav.payments")}
                            </Link>
                        </Show>
                        <Link route=AppRoute::Profile class=link_class(AppRoute::Profile)>
                            {move || locale.t("nav.profile")}
                        </Link>
                        <span class="badge badge-neutral hidden md:inline-flex">{user_name}</span>
                        <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| locale.toggle()>
                            <Language attr:class="h-4 w-4" />
                            {move || locale.t("nav.language")}
                        </button>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                            <ArrowRightOnRectangle attr:class="h-4 w-4" />
                            {move || locale.t("nav.logout")}
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}
