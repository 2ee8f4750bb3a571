use leptos::prelude::*;
use manhaj::reorder::{ItemRef, ReorderScope};
use manhaj_shared::{MaterialItem, Section};

use super::drag_row::DragRow;
use super::editor_state::{DeleteTarget, MaterialForm, TitleTarget, use_editor};
use super::title_form::InlineTitleForm;
use crate::components::icons::{
    Bars, Clipboard, LockClosed, LockOpen, Pencil, PlayCircle, Plus, Trash,
};
use crate::context::use_app;

#[component]
pub fn SectionPanel(section: Section) -> impl IntoView {
    let state = use_editor();
    let locale = use_app().locale;
    let section_id = section.id;
    let title = section.title.clone();

    let is_renaming = move || state.title_edit.get() == Some(TitleTarget::Section(section_id));
    let by_type = move || state.by_type.with(|set| set.contains(&section_id));

    let header = {
        let title = title.clone();
        move || {
            if is_renaming() {
                view! { <InlineTitleForm target=TitleTarget::Section(section_id) initial=title.clone() /> }
                    .into_any()
            } else {
                view! { <span class="font-medium">{title.clone()}</span> }.into_any()
            }
        }
    };

    let body = move || {
        if by_type() {
            view! { <TypedLists section=section.clone() /> }.into_any()
        } else {
            view! { <UnifiedList section=section.clone() /> }.into_any()
        }
    };

    view! {
        <div class="rounded-box border border-base-300 bg-base-100 p-3 space-y-2">
            <div class="flex items-center gap-2">
                <Bars attr:class="h-4 w-4 cursor-grab text-base-content/40" />
                <div class="flex-1">{header}</div>
                <div class="join">
                    <button
                        class=move || if by_type() { "btn btn-xs join-item" } else { "btn btn-xs join-item btn-active" }
                        on:click=move |_| if by_type() { state.toggle_by_type(section_id) }
                    >
                        {move || locale.t("editor.view_unified")}
                    </button>
                    <button
                        class=move || if by_type() { "btn btn-xs join-item btn-active" } else { "btn btn-xs join-item" }
                        on:click=move |_| if !by_type() { state.toggle_by_type(section_id) }
                    >
                        {move || locale.t("editor.view_by_type")}
                    </button>
                </div>
                <button
                    class="btn btn-ghost btn-xs gap-1"
                    on:click=move |_| state.open_material(MaterialForm::NewVideo { section_id })
                >
                    <Plus attr:class="h-3 w-3" /> {move || locale.t("editor.add_video")}
                </button>
                <button
                    class="btn btn-ghost btn-xs gap-1"
                    on:click=move |_| state.open_material(MaterialForm::NewQuiz { section_id })
                >
                    <Plus attr:class="h-3 w-3" /> {move || locale.t("editor.add_quiz")}
                </button>
                <button
                    class="btn btn-ghost btn-xs btn-square"
                    on:click=move |_| state.title_edit.set(Some(TitleTarget::Section(section_id)))
                >
                    <Pencil attr:class="h-4 w-4" />
                </button>
                <button
                    class="btn btn-ghost btn-xs btn-square text-error"
                    on:click=move |_| state.request_delete(DeleteTarget::Section(section_id))
                >
                    <Trash attr:class="h-4 w-4" />
                </button>
            </div>
            {body}
        </div>
    }
}

/// 视频与测验合并为一个列表，可跨类型拖拽
#[component]
fn UnifiedList(section: Section) -> impl IntoView {
    let locale = use_app().locale;
    let scope = ReorderScope::Materials {
        section_id: section.id,
    };
    let materials = section.materials();

    if materials.is_empty() {
        return view! {
            <p class="text-sm text-base-content/50 px-2">{move || locale.t("editor.empty_section")}</p>
        }
        .into_any();
    }

    view! {
        <div class="space-y-1">
            {materials
                .into_iter()
                .map(|item| view! { <MaterialRow item=item scope=scope /> })
                .collect_view()}
        </div>
    }
    .into_any()
}

/// 视频列表与测验列表分开排序
#[component]
fn TypedLists(section: Section) -> impl IntoView {
    let locale = use_app().locale;
    let videos = ReorderScope::Videos {
        section_id: section.id,
    };
    let quizzes = ReorderScope::Quizzes {
        section_id: section.id,
    };

    view! {
        <div class="grid gap-3 md:grid-cols-2">
            <div class="space-y-1">
                <h5 class="text-xs uppercase text-base-content/60">{move || locale.t("editor.stats_videos")}</h5>
                {section
                    .videos
                    .into_iter()
                    .map(|v| view! { <MaterialRow item=MaterialItem::Video(v) scope=videos /> })
                    .collect_view()}
            </div>
            <div class="space-y-1">
                <h5 class="text-xs uppercase text-base-content/60">{move || locale.t("editor.stats_quizzes")}</h5>
                {section
                    .quizzes
                    .into_iter()
                    .map(|q| view! { <MaterialRow item=MaterialItem::Quiz(q) scope=quizzes /> })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn MaterialRow(item: MaterialItem, scope: ReorderScope) -> impl IntoView {
    let state = use_editor();
    let locale = use_app().locale;
    let key = item.key();
    let is_locked = item.is_locked();
    let minutes = item.duration_minutes();

    let (icon, edit_form, delete_target) = match &item {
        MaterialItem::Video(video) => (
            view! { <PlayCircle attr:class="h-4 w-4 text-primary" /> }.into_any(),
            MaterialForm::Video(video.clone()),
            DeleteTarget::Video(video.id),
        ),
        MaterialItem::Quiz(quiz) => (
            view! { <Clipboard attr:class="h-4 w-4 text-secondary" /> }.into_any(),
            MaterialForm::Quiz(quiz.id),
            DeleteTarget::Quiz(quiz.id),
        ),
    };
    let edit_form = StoredValue::new(edit_form);

    view! {
        <DragRow
            item=ItemRef::from(key)
            scope=scope
            class="flex items-center gap-2 rounded-lg bg-base-200 px-3 py-2"
        >
            <Bars attr:class="h-4 w-4 cursor-grab text-base-content/40" />
            {icon}
            <span class="flex-1 truncate">{item.title().to_string()}</span>
            <span class="text-xs text-base-content/60">
                {minutes} " " {move || locale.t("common.minutes")}
            </span>
            <button
                class=if is_locked { "btn btn-xs btn-warning gap-1" } else { "btn btn-xs btn-ghost gap-1" }
                title=move || locale.t(if is_locked { "editor.unlock" } else { "editor.lock" })
                on:click=move |_| state.toggle_lock(key)
            >
                {if is_locked {
                    view! { <LockClosed attr:class="h-3 w-3" /> }.into_any()
                } else {
                    view! { <LockOpen attr:class="h-3 w-3" /> }.into_any()
                }}
                {move || is_locked.then(|| locale.t("editor.locked"))}
            </button>
            <button
                class="btn btn-ghost btn-xs btn-square"
                on:click=move |_| state.open_material(edit_form.get_value())
            >
                <Pencil attr:class="h-4 w-4" />
            </button>
            <button
                class="btn btn-ghost btn-xs btn-square text-error"
                on:click=move |_| state.request_delete(delete_target)
            >
                <Trash attr:class="h-4 w-4" />
            </button>
        </DragRow>
    }
}
