use leptos::prelude::*;
use manhaj::forms::ConfirmGate;

use crate::components::icons::ExclamationCircle;
use crate::context::use_app;

/// 删除确认对话框
///
/// `message` 为文案键，非空时打开。必须勾选确认框后"确认"按钮才可用。
#[component]
pub fn ConfirmDialog(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let locale = use_app().locale;
    let gate = RwSignal::new(ConfirmGate::new());
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let open = message.with(Option::is_some);
        if let Some(dialog) = dialog_ref.get() {
            if open && !dialog.open() {
                gate.set(ConfirmGate::new());
                let _ = dialog.show_modal();
            } else if !open && dialog.open() {
                dialog.close();
            }
        }
    });

    let confirm = move |_| {
        let mut confirmed = false;
        gate.update(|g| confirmed = g.confirm());
        if confirmed {
            on_confirm.run(());
        }
    };

    view! {
        <dialog
            class="modal"
            node_ref=dialog_ref
            on:cancel=move |ev| {
                ev.prevent_default();
                on_cancel.run(());
            }
        >
            <div class="modal-box">
                <h3 class="font-bold text-lg flex items-center gap-2">
                    <ExclamationCircle attr:class="h-6 w-6 text-error" />
                    {move || locale.t("confirm.title")}
                </h3>
                <p class="py-4 text-base-content/70">
                    {move || message.get().map(|key| locale.t(&key))}
                </p>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="checkbox checkbox-error"
                        prop:checked=move || gate.get().can_confirm()
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            gate.update(|g| g.set_acknowledged(checked));
                        }
                    />
                    <span class="label-text">{move || locale.t("confirm.acknowledge")}</span>
                </label>
                <div class="modal-action">
                    <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                        {move || locale.t("common.cancel")}
                    </button>
                    <button
                        type="button"
                        class="btn btn-error"
                        disabled=move || !gate.get().can_confirm()
                        on:click=confirm
                    >
                        {move || locale.t("common.delete")}
                    </button>
                </div>
            </div>
        </dialog>
    }
}
