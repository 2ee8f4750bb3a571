use leptos::prelude::*;
use manhaj::forms::TitleDraft;

use super::editor_state::{TitleTarget, use_editor};
use crate::components::icons::{Check, XMark};
use crate::context::use_app;

/// 章节 / 小节标题的行内表单
#[component]
pub fn InlineTitleForm(target: TitleTarget, #[prop(optional)] initial: String) -> impl IntoView {
    let state = use_editor();
    let locale = use_app().locale;
    let (title, set_title) = signal(initial);

    let placeholder = move || match target {
        TitleTarget::NewChapter | TitleTarget::Chapter(_) => locale.t("editor.chapter_title"),
        TitleTarget::NewSection { .. } | TitleTarget::Section(_) => locale.t("editor.section_title"),
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        state.save_title(
            target,
            TitleDraft {
                title: title.get_untracked(),
            },
        );
    };

    view! {
        <form class="join w-full" on:submit=on_submit>
            <input
                type="text"
                class="input input-bordered input-sm join-item flex-1"
                placeholder=placeholder
                prop:value=title
                on:input=move |ev| set_title.set(event_target_value(&ev))
                autofocus
            />
            <button type="submit" class="btn btn-sm btn-primary join-item">
                <Check attr:class="h-4 w-4" />
            </button>
            <button type="button" class="btn btn-sm join-item" on:click=move |_| state.title_edit.set(None)>
                <XMark attr:class="h-4 w-4" />
            </button>
        </form>
    }
}
