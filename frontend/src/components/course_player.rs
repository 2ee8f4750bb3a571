//! 课程播放
//!
//! 把结构树展开为一条序列，上一项与下一项可以跨越小节和章节。
//! 当前位置（材料身份、下标、测验题号）每次变化都写入本地存储，重新进入时恢复。

mod video_guard;

use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::log_warn;
use manhaj::playback::{PlaybackCursor, PlaybackEntry, flatten, load_progress, save_progress};
use manhaj_shared::{CourseId, MaterialItem, MaterialKind, Quiz};

use self::video_guard::GuardedVideo;
use crate::components::icons::{
    Check, ChevronLeft, ChevronRight, Clipboard, LockClosed, PlayCircle, XMark,
};
use crate::context::use_app;
use crate::web::BrowserStorage;

// =========================================================
// 侧边栏分组
// =========================================================

struct OutlineItem {
    index: usize,
    title: String,
    kind: MaterialKind,
    locked: bool,
}

struct SectionOutline {
    title: String,
    items: Vec<OutlineItem>,
}

struct ChapterOutline {
    title: String,
    sections: Vec<SectionOutline>,
}

/// 按章节与小节把展开序列重新分组，保留每项在序列中的下标
fn outline(entries: &[PlaybackEntry]) -> Vec<ChapterOutline> {
    let mut chapters: Vec<ChapterOutline> = Vec::new();
    let mut last: Option<(u64, u64)> = None;

    for (index, entry) in entries.iter().enumerate() {
        let item = OutlineItem {
            index,
            title: entry.item.title().to_string(),
            kind: entry.item.kind(),
            locked: entry.item.is_locked(),
        };
        match last {
            Some((chapter_id, section_id))
                if chapter_id == entry.chapter_id && section_id == entry.section_id =>
            {
                if let Some(section) = chapters.last_mut().and_then(|c| c.sections.last_mut()) {
                    section.items.push(item);
                }
            }
            Some((chapter_id, _)) if chapter_id == entry.chapter_id => {
                if let Some(chapter) = chapters.last_mut() {
                    chapter.sections.push(SectionOutline {
                        title: entry.section_title.clone(),
                        items: vec![item],
                    });
                }
            }
            _ => chapters.push(ChapterOutline {
                title: entry.chapter_title.clone(),
                sections: vec![SectionOutline {
                    title: entry.section_title.clone(),
                    items: vec![item],
                }],
            }),
        }
        last = Some((entry.chapter_id, entry.section_id));
    }
    chapters
}

#[component]
pub fn CoursePlayerPage(course_id: CourseId) -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let entries = RwSignal::new(Vec::<PlaybackEntry>::new());
    let cursor = RwSignal::new(PlaybackCursor::default());
    let (loading, set_loading) = signal(true);

    {
        let app = app.clone();
        spawn_local(async move {
            match app.api.fetch_structure(course_id).await {
                Ok(chapters) => {
                    let flat = flatten(&chapters);
                    let progress = load_progress(&BrowserStorage, course_id);
                    cursor.set(PlaybackCursor::restore(&flat, progress.as_ref()));
                    entries.set(flat);
                }
                Err(e) => app.report(&e),
            }
            set_loading.set(false);
        });
    }

    Effect::new(move |_| {
        let position = cursor.get();
        let Some(progress) = entries.with(|e| position.progress(e)) else {
            return;
        };
        if let Err(e) = save_progress(&BrowserStorage, course_id, &progress) {
            log_warn!("[Playback] Could not save progress for course {}: {}", course_id, e);
        }
    });

    let current = Memo::new(move |_| entries.with(|e| cursor.get().current(e).cloned()));
    let len = move || entries.with(Vec::len);

    let go_previous = move |_| {
        cursor.update(|c| {
            c.previous();
        });
    };
    let go_next = move |_| {
        let len = entries.with_untracked(Vec::len);
        cursor.update(|c| {
            c.next(len);
        });
    };

    let sidebar = move || {
        let selected = cursor.get().index();
        entries.with(|e| outline(e)).into_iter().map(|chapter| {
            let sections = chapter.sections.into_iter().map(|section| {
                let items = section.items.into_iter().map(|item| {
                    let index = item.index;
                    let class = if index == selected { "active" } else { "" };
                    let icon = match (item.locked, item.kind) {
                        (true, _) => view! { <LockClosed attr:class="h-4 w-4 text-warning" /> }.into_any(),
                        (false, MaterialKind::Video) => view! { <PlayCircle attr:class="h-4 w-4" /> }.into_any(),
                        (false, MaterialKind::Quiz) => view! { <Clipboard attr:class="h-4 w-4" /> }.into_any(),
                    };
                    view! {
                        <li>
                            <a
                                class=class
                                on:click=move |_| {
                                    let len = entries.with_untracked(Vec::len);
                                    cursor.update(|c| {
                                        c.select(index, len);
                                    });
                                }
                            >
                                {icon}
                                <span class="truncate">{item.title}</span>
                            </a>
                        </li>
                    }
                }).collect_view();
                view! {
                    <li>
                        <h4 class="menu-title">{section.title}</h4>
                        <ul>{items}</ul>
                    </li>
                }
            }).collect_view();
            view! {
                <li>
                    <details open=true>
                        <summary class="font-semibold">{chapter.title}</summary>
                        <ul>{sections}</ul>
                    </details>
                </li>
            }
        }).collect_view()
    };

    let stage = move || {
        let Some(entry) = current.get() else {
            return view! {
                <p class="text-center py-16 text-base-content/50">{move || locale.t("player.empty")}</p>
            }
            .into_any();
        };

        let body = if entry.item.is_locked() {
            view! {
                <div class="flex flex-col items-center gap-3 py-16 text-base-content/60">
                    <LockClosed attr:class="h-12 w-12 text-warning" />
                    <p>{move || locale.t("player.locked")}</p>
                </div>
            }
            .into_any()
        } else {
            match entry.item.clone() {
                MaterialItem::Video(video) => match video.source_url() {
                    Some(src) => view! {
                        <GuardedVideo src=src.to_string() />
                        <p class="whitespace-pre-line text-base-content/80">{video.description.clone()}</p>
                    }
                    .into_any(),
                    None => view! {
                        <p class="text-center py-16 text-base-content/50">{move || locale.t("player.no_source")}</p>
                    }
                    .into_any(),
                },
                MaterialItem::Quiz(quiz) => view! { <QuizStepper quiz=quiz cursor=cursor entries=entries /> }.into_any(),
            }
        };

        view! {
            <div class="text-sm breadcrumbs text-base-content/60">
                <ul>
                    <li>{entry.chapter_title.clone()}</li>
                    <li>{entry.section_title.clone()}</li>
                </ul>
            </div>
            <h2 class="text-2xl font-bold">{entry.item.title().to_string()}</h2>
            {body}
        }
        .into_any()
    };

    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! {
                <div class="flex justify-center py-16">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="flex flex-col lg:flex-row gap-6">
                <aside class="lg:w-80 shrink-0">
                    <ul class="menu bg-base-100 rounded-box shadow w-full">{sidebar}</ul>
                </aside>
                <section class="flex-1 space-y-4">
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body space-y-4">{stage}</div>
                    </div>
                    <Show when=move || len() > 0>
                        <div class="flex justify-between">
                            <button
                                class="btn btn-outline gap-1"
                                disabled=move || !cursor.get().has_previous()
                                on:click=go_previous
                            >
                                {move || if locale.is_rtl() {
                                    view! { <ChevronRight attr:class="h-4 w-4" /> }.into_any()
                                } else {
                                    view! { <ChevronLeft attr:class="h-4 w-4" /> }.into_any()
                                }}
                                {move || locale.t("player.previous")}
                            </button>
                            <span class="self-center text-sm text-base-content/60">
                                {move || cursor.get().index() + 1} " / " {len}
                            </span>
                            <button
                                class="btn btn-primary gap-1"
                                disabled=move || !cursor.get().has_next(len())
                                on:click=go_next
                            >
                                {move || locale.t("player.next")}
                                {move || if locale.is_rtl() {
                                    view! { <ChevronLeft attr:class="h-4 w-4" /> }.into_any()
                                } else {
                                    view! { <ChevronRight attr:class="h-4 w-4" /> }.into_any()
                                }}
                            </button>
                        </div>
                    </Show>
                </section>
            </div>
        </Show>
    }
}

/// 测验逐题浏览；题号写回游标，随进度一起保存
#[component]
fn QuizStepper(
    quiz: Quiz,
    cursor: RwSignal<PlaybackCursor>,
    entries: RwSignal<Vec<PlaybackEntry>>,
) -> impl IntoView {
    let locale = use_app().locale;
    let total = quiz.questions.len();
    let questions = StoredValue::new(quiz.questions);
    let chosen = RwSignal::new(Option::<usize>::None);

    let step = move |question_index: usize| {
        chosen.set(None);
        entries.with_untracked(|e| {
            cursor.update(|c| {
                c.set_question(question_index, e);
            });
        });
    };

    let question_view = move || {
        let index = cursor.get().question_index();
        let question = questions.with_value(|q| q.get(index).cloned())?;
        let correct = question.correct_index();
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let class = move || match chosen.get() {
                    Some(_) if Some(i) == correct => "btn btn-success justify-start no-animation",
                    Some(picked) if picked == i => "btn btn-error justify-start no-animation",
                    _ => "btn btn-outline justify-start",
                };
                let mark = move || match chosen.get() {
                    Some(_) if Some(i) == correct => Some(view! { <Check attr:class="h-4 w-4" /> }.into_any()),
                    Some(picked) if picked == i => Some(view! { <XMark attr:class="h-4 w-4" /> }.into_any()),
                    _ => None,
                };
                view! {
                    <button
                        class=class
                        on:click=move |_| {
                            if chosen.get_untracked().is_none() {
                                chosen.set(Some(i));
                            }
                        }
                    >
                        {mark}
                        {option.option_text.clone()}
                    </button>
                }
            })
            .collect_view();

        Some(view! {
            <div class="space-y-3">
                <p class="text-sm text-base-content/60">
                    {move || locale.t("player.question")} " " {index + 1} " "
                    {move || locale.t("player.of")} " " {total}
                </p>
                <p class="text-lg">{question.question_text.clone()}</p>
                {question.question_image_url.clone().map(|src| view! {
                    <img src=src alt="" class="max-h-80 rounded-box" />
                })}
                <div class="grid gap-2">{options}</div>
            </div>
        })
    };

    view! {
        <Show
            when=move || total > 0
            fallback=move || view! {
                <p class="text-center py-8 text-base-content/50">{locale.t("player.no_questions")}</p>
            }
        >
            {question_view}
            <div class="join">
                <button
                    class="btn btn-sm join-item"
                    disabled=move || cursor.get().question_index() == 0
                    on:click=move |_| step(cursor.get_untracked().question_index().saturating_sub(1))
                >
                    {move || locale.t("player.previous")}
                </button>
                <button
                    class="btn btn-sm join-item"
                    disabled=move || cursor.get().question_index() + 1 >= total
                    on:click=move |_| step(cursor.get_untracked().question_index() + 1)
                >
                    {move || locale.t("player.next")}
                </button>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manhaj_shared::{Chapter, Section, Video};

    fn video(id: u64, order: i32) -> Video {
        Video {
            id,
            title: format!("v{}", id),
            description: String::new(),
            video_url: None,
            video_file_url: None,
            duration_minutes: 1,
            is_locked: id == 3,
            order,
        }
    }

    fn section(id: u64, order: i32, videos: Vec<Video>) -> Section {
        Section {
            id,
            title: format!("s{}", id),
            order,
            videos,
            quizzes: Vec::new(),
        }
    }

    #[test]
    fn outline_groups_consecutive_entries() {
        let chapters = vec![
            Chapter {
                id: 1,
                title: "c1".into(),
                order: 0,
                sections: vec![
                    section(10, 0, vec![video(1, 0), video(2, 1)]),
                    section(11, 1, vec![video(3, 0)]),
                ],
            },
            Chapter {
                id: 2,
                title: "c2".into(),
                order: 1,
                sections: vec![section(20, 0, vec![video(4, 0)])],
            },
        ];

        let grouped = outline(&flatten(&chapters));
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].sections.len(), 2);
        assert_eq!(grouped[0].sections[0].items.len(), 2);
        assert!(grouped[0].sections[1].items[0].locked);
        assert_eq!(grouped[1].sections[0].title, "s20");
        assert_eq!(grouped[1].sections[0].items[0].index, 3);
    }

    #[test]
    fn outline_of_nothing_is_empty() {
        assert!(outline(&[]).is_empty());
    }
}
