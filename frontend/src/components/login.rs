use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::LoginDraft;
use manhaj::{ClientError, ClientErrorKind};

use crate::auth::login;
use crate::components::icons::{BookOpen, ExclamationCircle, Language};
use crate::context::use_app;

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let session = app.session;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error, set_error) = signal(Option::<ClientError>::None);

    // 登录成功后由路由服务的认证监听跳转到课程列表
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = LoginDraft {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let (email, password) = match draft.validate() {
            Ok(credentials) => credentials,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error.set(None);

        let api = app.api.clone();
        spawn_local(async move {
            if let Err(e) = login(session, &api, &email, &password).await {
                set_error.set(Some(e));
            }
            set_is_submitting.set(false);
        });
    };

    // 401/403 时显示"邮箱或密码错误"，其余错误按类型翻译
    let error_text = move || {
        error.with(|e| {
            e.as_ref().map(|e| match e.kind {
                ClientErrorKind::Unauthorized => locale.t("login.failed"),
                _ => locale.error_text(e),
            })
        })
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <BookOpen attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{move || locale.platform_name()}</h1>
                        <p class="text-base-content/70">{move || locale.t("login.title")}</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error.with(Option::is_some)>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <ExclamationCircle attr:class="stroke-current shrink-0 h-6 w-6" />
                                <span>{error_text}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">{move || locale.t("login.email")}</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="username"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">{move || locale.t("login.password")}</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> {locale.t("common.loading")} }.into_any()
                                } else {
                                    locale.t("login.submit").into_any()
                                }}
                            </button>
                        </div>
                        <button type="button" class="btn btn-ghost btn-sm gap-2" on:click=move |_| locale.toggle()>
                            <Language attr:class="h-4 w-4" />
                            {move || locale.t("nav.language")}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
