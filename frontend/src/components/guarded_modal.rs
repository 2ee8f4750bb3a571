use leptos::prelude::*;
use manhaj::forms::{CloseDecision, ModalGuard};

use crate::components::icons::XMark;
use crate::context::use_app;

/// 带未保存修改保护的模态框
///
/// 内容只在打开期间挂载，每次打开都是新的表单状态。内容组件在输入时调用
/// `mark_dirty`，保存成功后调用 `force_close`。关闭按钮、Esc 和点击背景
/// 都走 `request_close`，有修改时先询问是否放弃。
#[component]
pub fn GuardedModal(
    guard: RwSignal<ModalGuard>,
    #[prop(into)] title: Signal<String>,
    #[prop(optional)] wide: bool,
    children: ChildrenFn,
) -> impl IntoView {
    let locale = use_app().locale;
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let asking = RwSignal::new(false);
    let is_open = move || guard.with(ModalGuard::is_open);

    Effect::new(move |_| {
        let open = is_open();
        if let Some(dialog) = dialog_ref.get() {
            if open && !dialog.open() {
                asking.set(false);
                let _ = dialog.show_modal();
            } else if !open && dialog.open() {
                dialog.close();
            }
        }
    });

    let request_close = move || {
        let mut decision = CloseDecision::Close;
        guard.update(|g| decision = g.request_close());
        if decision == CloseDecision::AskConfirmation {
            asking.set(true);
        }
    };

    let discard = move |_| {
        asking.set(false);
        guard.update(ModalGuard::force_close);
    };

    let box_class = if wide { "modal-box max-w-3xl" } else { "modal-box" };

    view! {
        <dialog
            class="modal"
            node_ref=dialog_ref
            on:cancel=move |ev| {
                ev.prevent_default();
                request_close();
            }
        >
            <div class=box_class>
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-lg">{move || title.get()}</h3>
                    <button
                        type="button"
                        class="btn btn-sm btn-circle btn-ghost"
                        on:click=move |_| request_close()
                    >
                        <XMark attr:class="h-4 w-4" />
                    </button>
                </div>

                <Show when=move || asking.get()>
                    <div role="alert" class="alert alert-warning mb-4 flex-col items-start">
                        <span class="font-semibold">{move || locale.t("modal.discard_title")}</span>
                        <span class="text-sm">{move || locale.t("modal.discard_body")}</span>
                        <div class="flex gap-2 self-end">
                            <button type="button" class="btn btn-sm" on:click=move |_| asking.set(false)>
                                {move || locale.t("modal.keep_editing")}
                            </button>
                            <button type="button" class="btn btn-sm btn-warning" on:click=discard>
                                {move || locale.t("modal.discard")}
                            </button>
                        </div>
                    </div>
                </Show>

                <Show when=is_open>{children()}</Show>
            </div>
            <div class="modal-backdrop" on:click=move |_| request_close()></div>
        </dialog>
    }
}
