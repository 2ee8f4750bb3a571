//! 课程结构编辑器
//!
//! 章节 -> 小节 -> 材料三层可展开的树，五个层级都支持拖拽排序。
//! 增删改之后重新拉取结构树；排序与锁定采用乐观更新。

mod drag_row;
mod editor_state;
mod question_builder;
mod quiz_form;
mod section_panel;
mod title_form;
mod video_form;

use leptos::prelude::*;
use manhaj::reorder::{ItemRef, ReorderScope};
use manhaj::structure::CourseStats;
use manhaj_shared::{Chapter, CourseId};

use self::drag_row::DragRow;
use self::editor_state::{
    DeleteTarget, EditorState, MaterialForm, TitleTarget, provide_editor, use_editor,
};
use self::quiz_form::QuizForm;
use self::section_panel::SectionPanel;
use self::title_form::InlineTitleForm;
use self::video_form::VideoForm;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::guarded_modal::GuardedModal;
use crate::components::icons::{Bars, ChevronLeft, ChevronRight, Pencil, Plus, Trash};
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn CourseEditorPage(course_id: CourseId) -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let state = EditorState::new(course_id, app);
    provide_editor(state);
    state.load();

    let stats = Memo::new(move |_| state.chapters.with(|c| CourseStats::from_tree(c)));

    let chapters_view = move || {
        state.chapters.with(|chapters| {
            chapters
                .iter()
                .map(|chapter| view! { <ChapterCard chapter=chapter.clone() /> })
                .collect_view()
        })
    };

    let modal_title = Signal::derive(move || {
        let key = match state.material_form.get() {
            Some(MaterialForm::NewVideo { .. }) => "video.new",
            Some(MaterialForm::Video(_)) => "video.edit",
            Some(MaterialForm::NewQuiz { .. }) => "quiz.new",
            Some(MaterialForm::Quiz(_)) | None => "quiz.edit",
        };
        locale.t(key)
    });

    let modal_body = move || {
        let form = state.material_form.get()?;
        Some(match form {
            MaterialForm::NewVideo { section_id } => {
                view! { <VideoForm section_id=section_id /> }.into_any()
            }
            MaterialForm::Video(video) => {
                let section_id = section_of_video(&state, video.id).unwrap_or_default();
                view! { <VideoForm section_id=section_id video=video /> }.into_any()
            }
            MaterialForm::NewQuiz { section_id } => {
                view! { <QuizForm section_id=section_id /> }.into_any()
            }
            MaterialForm::Quiz(quiz_id) => {
                let section_id = section_of_quiz(&state, quiz_id).unwrap_or_default();
                view! { <QuizForm section_id=section_id quiz_id=quiz_id /> }.into_any()
            }
        })
    };

    let delete_message =
        Signal::derive(move || state.pending_delete.get().map(|t| t.message_key().to_string()));

    view! {
        <div class="space-y-6">
            <div class="flex items-center gap-2">
                <Link route=AppRoute::Courses class="btn btn-ghost btn-sm gap-1">
                    {move || if locale.is_rtl() {
                        view! { <ChevronRight attr:class="h-4 w-4" /> }.into_any()
                    } else {
                        view! { <ChevronLeft attr:class="h-4 w-4" /> }.into_any()
                    }}
                    {move || locale.t("common.back")}
                </Link>
                <h2 class="text-2xl font-bold flex-1">{move || locale.t("editor.title")}</h2>
                <Link route=AppRoute::CoursePlayer(course_id) class="btn btn-outline btn-sm">
                    {move || locale.t("courses.preview")}
                </Link>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">{move || locale.t("editor.stats_chapters")}</div>
                    <div class="stat-value text-primary">{move || stats.get().chapters}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{move || locale.t("editor.stats_sections")}</div>
                    <div class="stat-value">{move || stats.get().sections}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{move || locale.t("editor.stats_videos")}</div>
                    <div class="stat-value">{move || stats.get().videos}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{move || locale.t("editor.stats_quizzes")}</div>
                    <div class="stat-value">{move || stats.get().quizzes}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{move || locale.t("editor.stats_minutes")}</div>
                    <div class="stat-value text-secondary">{move || stats.get().total_minutes}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body space-y-3">
                    <div class="flex items-center justify-between">
                        <p class="text-sm text-base-content/60">{move || locale.t("editor.drag_hint")}</p>
                        <button
                            class="btn btn-primary btn-sm gap-1"
                            on:click=move |_| state.title_edit.set(Some(TitleTarget::NewChapter))
                        >
                            <Plus attr:class="h-4 w-4" /> {move || locale.t("editor.add_chapter")}
                        </button>
                    </div>

                    <Show when=move || state.title_edit.get() == Some(TitleTarget::NewChapter)>
                        <InlineTitleForm target=TitleTarget::NewChapter />
                    </Show>

                    <Show
                        when=move || !state.loading.get()
                        fallback=|| view! {
                            <div class="flex justify-center py-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <Show when=move || state.chapters.with(Vec::is_empty)>
                            <p class="text-center py-8 text-base-content/50">{move || locale.t("editor.empty")}</p>
                        </Show>
                        <div class="space-y-3">{chapters_view}</div>
                    </Show>
                </div>
            </div>
        </div>

        <GuardedModal guard=state.modal title=modal_title wide=true>
            {modal_body}
        </GuardedModal>

        <ConfirmDialog
            message=delete_message
            on_confirm=move |_| state.confirm_delete()
            on_cancel=move |_| state.pending_delete.set(None)
        />
    }
}

fn section_of_video(state: &EditorState, video_id: u64) -> Option<u64> {
    state.chapters.with_untracked(|chapters| {
        chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .find(|s| s.videos.iter().any(|v| v.id == video_id))
            .map(|s| s.id)
    })
}

fn section_of_quiz(state: &EditorState, quiz_id: u64) -> Option<u64> {
    state.chapters.with_untracked(|chapters| {
        chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .find(|s| s.quizzes.iter().any(|q| q.id == quiz_id))
            .map(|s| s.id)
    })
}

#[component]
fn ChapterCard(chapter: Chapter) -> impl IntoView {
    let state = use_editor();
    let locale = use_app().locale;
    let chapter_id = chapter.id;
    let scope = ReorderScope::Chapters {
        course_id: state.course_id,
    };
    let section_scope = ReorderScope::Sections { chapter_id };
    let title = chapter.title.clone();
    let section_count = chapter.sections.len();

    let is_expanded = move || state.expanded.with(|set| set.contains(&chapter_id));
    let is_renaming = move || state.title_edit.get() == Some(TitleTarget::Chapter(chapter_id));
    let is_adding_section =
        move || state.title_edit.get() == Some(TitleTarget::NewSection { chapter_id });

    let header = move || {
        if is_renaming() {
            view! { <InlineTitleForm target=TitleTarget::Chapter(chapter_id) initial=title.clone() /> }
                .into_any()
        } else {
            view! { <h4 class="font-semibold">{title.clone()}</h4> }.into_any()
        }
    };

    let sections = chapter.sections;
    let sections_view = move || {
        sections
            .iter()
            .map(|section| {
                view! {
                    <DragRow item=ItemRef::section(section.id) scope=section_scope>
                        <SectionPanel section=section.clone() />
                    </DragRow>
                }
            })
            .collect_view()
    };

    view! {
        <DragRow
            item=ItemRef::chapter(chapter_id)
            scope=scope
            class="rounded-box border border-base-300 bg-base-200 p-4 space-y-3"
        >
            <div class="flex items-center gap-2">
                <Bars attr:class="h-5 w-5 cursor-grab text-base-content/40" />
                <button class="btn btn-ghost btn-xs btn-square" on:click=move |_| state.toggle_expanded(chapter_id)>
                    <span class=move || if is_expanded() { "rotate-90 transition-transform" } else { "transition-transform" }>
                        <ChevronRight attr:class="h-4 w-4" />
                    </span>
                </button>
                <div class="flex-1">{header}</div>
                <span class="badge badge-ghost">{section_count} " " {move || locale.t("editor.stats_sections")}</span>
                <button
                    class="btn btn-ghost btn-xs gap-1"
                    on:click=move |_| {
                        state.expanded.update(|set| {
                            set.insert(chapter_id);
                        });
                        state.title_edit.set(Some(TitleTarget::NewSection { chapter_id }));
                    }
                >
                    <Plus attr:class="h-3 w-3" /> {move || locale.t("editor.add_section")}
                </button>
                <button
                    class="btn btn-ghost btn-xs btn-square"
                    on:click=move |_| state.title_edit.set(Some(TitleTarget::Chapter(chapter_id)))
                >
                    <Pencil attr:class="h-4 w-4" />
                </button>
                <button
                    class="btn btn-ghost btn-xs btn-square text-error"
                    on:click=move |_| state.request_delete(DeleteTarget::Chapter(chapter_id))
                >
                    <Trash attr:class="h-4 w-4" />
                </button>
            </div>

            <Show when=is_expanded>
                <div class="space-y-2 ps-6">
                    {sections_view()}
                    <Show when=is_adding_section>
                        <InlineTitleForm target=TitleTarget::NewSection { chapter_id } />
                    </Show>
                </div>
            </Show>
        </DragRow>
    }
}
