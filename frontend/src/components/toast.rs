use leptos::prelude::*;

use crate::context::use_app;
use crate::web::timer;

/// 全局提示框，显示 `ToastContext` 中最新的一条并自动消失
#[component]
pub fn Toaster() -> impl IntoView {
    let app = use_app();
    let toast = app.toast;
    let duration = app.config.toast_duration;

    Effect::new(move |_| {
        if let Some(id) = toast.current.with(|t| t.as_ref().map(|t| t.id)) {
            // 按 id 关闭：新提示出现后旧定时器不会误关
            timer::after(duration, move || toast.dismiss(id)).forget();
        }
    });

    view! {
        <Show when=move || toast.current.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_error = toast.current.with(|t| t.as_ref().is_some_and(|t| t.is_error));
                    if is_error { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }
                }>
                    <span>{move || toast.current.with(|t| t.as_ref().map(|t| t.text.clone()))}</span>
                </div>
            </div>
        </Show>
    }
}
