use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::{ModalGuard, QuizDraft};
use manhaj::structure::find_quiz;
use manhaj_shared::{Question, QuestionType};

use super::editor_state::{DeleteTarget, use_editor};
use super::question_builder::QuestionBuilder;
use crate::components::icons::{Pencil, Photo, Plus, Trash};
use crate::context::use_app;

#[derive(Debug, Clone, PartialEq)]
enum QuestionEdit {
    New,
    Existing(Question),
}

/// 测验弹窗：基本信息 + 题目列表
///
/// 新测验需要先保存，之后弹窗保持打开并切换为编辑模式以便添加题目。
#[component]
pub fn QuizForm(section_id: u64, #[prop(optional)] quiz_id: Option<u64>) -> impl IntoView {
    let state = use_editor();
    let app = use_app();
    let locale = app.locale;

    let quiz_id = RwSignal::new(quiz_id);
    let initial = quiz_id
        .get_untracked()
        .and_then(|id| state.chapters.with_untracked(|c| find_quiz(c, id).map(QuizDraft::from_quiz)))
        .unwrap_or_default();
    let draft = RwSignal::new(initial);
    let (submitting, set_submitting) = signal(false);
    let editing_question = RwSignal::new(Option::<QuestionEdit>::None);

    let questions = move || {
        quiz_id.get().map_or_else(Vec::new, |id| {
            state
                .chapters
                .with(|c| find_quiz(c, id).map(|q| q.questions.clone()).unwrap_or_default())
        })
    };

    let edit = move |f: &dyn Fn(&mut QuizDraft)| {
        draft.update(|d| f(d));
        state.mark_dirty();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = match draft.with_untracked(QuizDraft::validate) {
            Ok(payload) => payload,
            Err(e) => {
                app.report(&e);
                return;
            }
        };

        set_submitting.set(true);
        let app = app.clone();
        spawn_local(async move {
            match quiz_id.get_untracked() {
                Some(id) => match app.api.send(&payload.into_update(id)).await {
                    Ok(_) => state.finish_material().await,
                    Err(e) => app.report(&e),
                },
                None => match app.api.send(&payload.into_create(section_id)).await {
                    Ok(quiz) => {
                        quiz_id.set(Some(quiz.id));
                        // 保持打开并清除未保存标记
                        state.modal.update(ModalGuard::open);
                        state.refresh("common.saved").await;
                    }
                    Err(e) => app.report(&e),
                },
            }
            set_submitting.set(false);
        });
    };

    let question_editor = move || {
        let id = quiz_id.get()?;
        let done = Callback::new(move |_| editing_question.set(None));
        Some(match editing_question.get()? {
            QuestionEdit::New => {
                let order = questions().len() as i32;
                view! { <QuestionBuilder quiz_id=id order=order on_done=done /> }.into_any()
            }
            QuestionEdit::Existing(question) => {
                view! { <QuestionBuilder quiz_id=id question=question on_done=done /> }.into_any()
            }
        })
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <div class="form-control">
                <label class="label"><span class="label-text">{move || locale.t("quiz.title")}</span></label>
                <input
                    type="text"
                    class="input input-bordered w-full"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d| d.title = value.clone());
                    }
                />
            </div>
            <div class="form-control">
                <label class="label"><span class="label-text">{move || locale.t("quiz.description")}</span></label>
                <textarea
                    class="textarea textarea-bordered w-full"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d| d.description = value.clone());
                    }
                ></textarea>
            </div>
            <div class="grid grid-cols-2 gap-4 items-end">
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("quiz.duration")}</span></label>
                    <input
                        type="number"
                        min="0"
                        class="input input-bordered w-full"
                        prop:value=move || draft.with(|d| d.duration.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(&|d| d.duration = value.clone());
                        }
                    />
                </div>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="toggle toggle-warning"
                        prop:checked=move || draft.with(|d| d.is_locked)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(&|d| d.is_locked = checked);
                        }
                    />
                    <span class="label-text">{move || locale.t("quiz.locked")}</span>
                </label>
            </div>
            <div class="flex justify-end">
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    <Show when=move || submitting.get()>
                        <span class="loading loading-spinner loading-sm"></span>
                    </Show>
                    {move || locale.t("common.save")}
                </button>
            </div>
        </form>

        <div class="divider">{move || locale.t("quiz.questions")}</div>

        <Show
            when=move || quiz_id.get().is_some()
            fallback=move || view! {
                <p class="text-sm text-base-content/60 text-center">{locale.t("quiz.save_first")}</p>
            }
        >
            <ol class="space-y-2 list-decimal list-inside">
                {move || {
                    questions()
                        .into_iter()
                        .map(|question| {
                            let question_id = question.id;
                            let label = if question.question_type == QuestionType::Image
                                && question.question_text.is_empty()
                            {
                                locale.t("quiz.question_image")
                            } else {
                                question.question_text.clone()
                            };
                            let has_image = question.question_image_url.is_some();
                            let editing = StoredValue::new(question);
                            view! {
                                <li class="flex items-center gap-2 rounded-lg bg-base-200 px-3 py-2">
                                    <span class="flex-1 truncate">{label}</span>
                                    {has_image.then(|| view! { <Photo attr:class="h-4 w-4 text-base-content/60" /> })}
                                    <button
                                        type="button"
                                        class="btn btn-ghost btn-xs btn-square"
                                        on:click=move |_| editing_question.set(Some(QuestionEdit::Existing(editing.get_value())))
                                    >
                                        <Pencil attr:class="h-4 w-4" />
                                    </button>
                                    <button
                                        type="button"
                                        class="btn btn-ghost btn-xs btn-square text-error"
                                        on:click=move |_| state.request_delete(DeleteTarget::Question(question_id))
                                    >
                                        <Trash attr:class="h-4 w-4" />
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ol>
            {question_editor}
            <Show when=move || editing_question.with(Option::is_none)>
                <button
                    type="button"
                    class="btn btn-outline btn-sm gap-1 mt-2"
                    on:click=move |_| editing_question.set(Some(QuestionEdit::New))
                >
                    <Plus attr:class="h-4 w-4" /> {move || locale.t("quiz.add_question")}
                </button>
            </Show>
        </Show>
    }
}
