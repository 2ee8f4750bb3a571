use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::{MIN_OPTIONS, QuestionDraft};
use manhaj_shared::{Question, QuestionType};
use web_sys::{DragEvent, File};

use super::editor_state::use_editor;
use crate::components::icons::{Photo, Plus, Trash};
use crate::context::use_app;
use crate::web::file::{dropped_file, is_image, preview_url, read_upload, revoke_preview, selected_file};

/// 题目编辑器
///
/// 文字题或图片题；图片可以拖放或选择文件，本地预览使用 object URL。
#[component]
pub fn QuestionBuilder(
    quiz_id: u64,
    #[prop(optional)] question: Option<Question>,
    /// 新题目的序号
    #[prop(optional)]
    order: i32,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let state = use_editor();
    let app = use_app();
    let locale = app.locale;

    let question_id = question.as_ref().map(|q| q.id);
    let draft = RwSignal::new(
        question
            .as_ref()
            .map(QuestionDraft::from_question)
            .unwrap_or_else(|| QuestionDraft::new(order)),
    );
    let preview = RwSignal::new(Option::<String>::None);
    let (submitting, set_submitting) = signal(false);
    let (drag_over, set_drag_over) = signal(false);

    on_cleanup(move || {
        if let Some(url) = preview.try_get_untracked().flatten() {
            revoke_preview(&url);
        }
    });

    let edit = move |f: &dyn Fn(&mut QuestionDraft)| {
        draft.update(|d| f(d));
        state.mark_dirty();
    };

    let take_image = move |file: File| {
        if !is_image(&file) {
            return;
        }
        if let Some(old) = preview.get_untracked() {
            revoke_preview(&old);
        }
        preview.set(preview_url(&file));
        let app = state.app();
        spawn_local(async move {
            match read_upload(&file).await {
                Ok(upload) => edit(&|d| d.image = Some(upload.clone())),
                Err(e) => app.report(&e),
            }
        });
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        if let Some(file) = dropped_file(&ev) {
            take_image(file);
        }
    };

    let on_submit = move |_| {
        let payload = match draft.with_untracked(QuestionDraft::validate) {
            Ok(payload) => payload,
            Err(e) => {
                app.report(&e);
                return;
            }
        };
        set_submitting.set(true);
        let app = app.clone();
        spawn_local(async move {
            let result = match question_id {
                Some(id) => app.api.update_question(id, &payload).await,
                None => app.api.create_question(quiz_id, &payload).await,
            };
            set_submitting.set(false);
            match result {
                Ok(_) => {
                    state.refresh("common.saved").await;
                    on_done.run(());
                }
                Err(e) => app.report(&e),
            }
        });
    };

    let is_image_type = move || draft.with(|d| d.question_type == QuestionType::Image);
    let image_src = move || {
        preview
            .get()
            .or_else(|| draft.with(|d| d.image_url.clone()))
    };

    view! {
        <div class="card bg-base-200 p-4 space-y-3">
            <div class="join">
                <button
                    type="button"
                    class=move || if is_image_type() { "btn btn-sm join-item" } else { "btn btn-sm join-item btn-active" }
                    on:click=move |_| edit(&|d| d.question_type = QuestionType::Text)
                >
                    {move || locale.t("quiz.type_text")}
                </button>
                <button
                    type="button"
                    class=move || if is_image_type() { "btn btn-sm join-item btn-active" } else { "btn btn-sm join-item" }
                    on:click=move |_| edit(&|d| d.question_type = QuestionType::Image)
                >
                    {move || locale.t("quiz.type_image")}
                </button>
            </div>

            <textarea
                class="textarea textarea-bordered w-full"
                placeholder=move || locale.t("quiz.question_text")
                prop:value=move || draft.with(|d| d.text.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(&|d| d.text = value.clone());
                }
            ></textarea>

            <Show when=is_image_type>
                <label
                    class=move || if drag_over.get() {
                        "flex flex-col items-center justify-center gap-2 rounded-box border-2 border-dashed border-primary p-4 cursor-pointer"
                    } else {
                        "flex flex-col items-center justify-center gap-2 rounded-box border-2 border-dashed border-base-300 p-4 cursor-pointer"
                    }
                    on:dragover=move |ev: DragEvent| {
                        ev.prevent_default();
                        set_drag_over.set(true);
                    }
                    on:dragleave=move |_| set_drag_over.set(false)
                    on:drop=on_drop
                >
                    {move || match image_src() {
                        Some(src) => view! { <img src=src alt="" class="max-h-48 rounded" /> }.into_any(),
                        None => view! { <Photo attr:class="h-10 w-10 text-base-content/40" /> }.into_any(),
                    }}
                    <span class="text-sm text-base-content/60">{move || locale.t("quiz.drop_image")}</span>
                    <input
                        type="file"
                        accept="image/*"
                        class="hidden"
                        on:change=move |ev| {
                            if let Some(file) = selected_file(&ev) {
                                take_image(file);
                            }
                        }
                    />
                </label>
            </Show>

            <div class="space-y-2">
                <For
                    each=move || draft.with(|d| d.options.clone())
                    key=|option| option.key
                    children=move |option| {
                        let key = option.key;
                        view! {
                            <div class="flex items-center gap-2">
                                <input
                                    type="radio"
                                    class="radio radio-success"
                                    title=move || locale.t("quiz.correct")
                                    prop:checked=move || draft.with(|d| d.options.iter().any(|o| o.key == key && o.is_correct))
                                    on:change=move |_| edit(&|d| d.mark_correct(key))
                                />
                                <input
                                    type="text"
                                    class="input input-bordered input-sm flex-1"
                                    placeholder=move || locale.t("quiz.option")
                                    prop:value=option.text.clone()
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        edit(&|d| d.set_option_text(key, &value));
                                    }
                                />
                                <button
                                    type="button"
                                    class="btn btn-ghost btn-sm btn-square text-error"
                                    disabled=move || draft.with(|d| d.options.len() <= MIN_OPTIONS)
                                    on:click=move |_| edit(&|d| {
                                        d.remove_option(key);
                                    })
                                >
                                    <Trash attr:class="h-4 w-4" />
                                </button>
                            </div>
                        }
                    }
                />
                <button
                    type="button"
                    class="btn btn-ghost btn-sm gap-1"
                    on:click=move |_| edit(&|d| {
                        d.add_option();
                    })
                >
                    <Plus attr:class="h-4 w-4" /> {move || locale.t("quiz.add_option")}
                </button>
            </div>

            <div class="flex justify-end gap-2">
                <button type="button" class="btn btn-sm" on:click=move |_| on_done.run(())>
                    {move || locale.t("common.cancel")}
                </button>
                <button
                    type="button"
                    class="btn btn-sm btn-primary"
                    disabled=move || submitting.get()
                    on:click=on_submit
                >
                    {move || locale.t("quiz.save_question")}
                </button>
            </div>
        </div>
    }
}
