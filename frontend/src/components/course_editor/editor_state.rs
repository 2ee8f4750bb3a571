//! 编辑器状态
//!
//! 结构树、拖拽面板和各个弹窗的开关都放在一个 `Copy` 句柄里，
//! 通过 Context 提供给编辑器内部的所有组件。

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::{ModalGuard, TitleDraft};
use manhaj::optimistic::{LockToggle, commit_reorder, refresh_after_mutation};
use manhaj::reorder::{DragBoard, DragPayload, DragPhase, ItemRef, ReorderScope};
use manhaj::{ClientResult, log_info};
use manhaj_shared::protocol::*;
use manhaj_shared::{Chapter, CourseId, MaterialKey, Video};

use crate::context::AppContext;

/// 章节 / 小节的行内标题表单
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTarget {
    NewChapter,
    Chapter(u64),
    NewSection { chapter_id: u64 },
    Section(u64),
}

/// 视频 / 测验弹窗的内容
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialForm {
    NewVideo { section_id: u64 },
    Video(Video),
    NewQuiz { section_id: u64 },
    Quiz(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Chapter(u64),
    Section(u64),
    Video(u64),
    Quiz(u64),
    Question(u64),
}

impl DeleteTarget {
    pub fn message_key(&self) -> &'static str {
        match self {
            DeleteTarget::Chapter(_) => "confirm.delete_chapter",
            DeleteTarget::Section(_) => "confirm.delete_section",
            DeleteTarget::Video(_) => "confirm.delete_video",
            DeleteTarget::Quiz(_) => "confirm.delete_quiz",
            DeleteTarget::Question(_) => "confirm.delete_question",
        }
    }
}

#[derive(Clone, Copy)]
pub struct EditorState {
    pub course_id: CourseId,
    pub chapters: RwSignal<Vec<Chapter>>,
    pub loading: RwSignal<bool>,
    board: RwSignal<DragBoard>,
    pub expanded: RwSignal<HashSet<u64>>,
    /// 按类型分开显示（视频列表 + 测验列表）的小节
    pub by_type: RwSignal<HashSet<u64>>,
    pub title_edit: RwSignal<Option<TitleTarget>>,
    pub material_form: RwSignal<Option<MaterialForm>>,
    pub modal: RwSignal<ModalGuard>,
    pub pending_delete: RwSignal<Option<DeleteTarget>>,
    app: StoredValue<AppContext>,
}

impl EditorState {
    pub fn new(course_id: CourseId, app: AppContext) -> Self {
        Self {
            course_id,
            chapters: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            board: RwSignal::new(DragBoard::new()),
            expanded: RwSignal::new(HashSet::new()),
            by_type: RwSignal::new(HashSet::new()),
            title_edit: RwSignal::new(None),
            material_form: RwSignal::new(None),
            modal: RwSignal::new(ModalGuard::default()),
            pending_delete: RwSignal::new(None),
            app: StoredValue::new(app),
        }
    }

    pub fn app(&self) -> AppContext {
        self.app.get_value()
    }

    // =========================================================
    // 加载
    // =========================================================

    /// 首次加载，所有章节默认展开
    pub fn load(&self) {
        let state = *self;
        let app = self.app();
        spawn_local(async move {
            match refresh_after_mutation(&app.api, state.course_id).await {
                Ok(chapters) => {
                    state.expanded.set(chapters.iter().map(|c| c.id).collect());
                    state.chapters.set(chapters);
                }
                Err(e) => app.report(&e),
            }
            state.loading.set(false);
        });
    }

    /// 增删改成功后重新拉取，保证序号与统计和服务器一致
    pub async fn refresh(&self, message_key: &str) {
        let app = self.app();
        match refresh_after_mutation(&app.api, self.course_id).await {
            Ok(chapters) => {
                self.chapters.set(chapters);
                app.toast.success(app.locale.t(message_key));
            }
            Err(e) => app.report(&e),
        }
    }

    pub fn toggle_expanded(&self, chapter_id: u64) {
        self.expanded.update(|set| {
            if !set.remove(&chapter_id) {
                set.insert(chapter_id);
            }
        });
    }

    pub fn toggle_by_type(&self, section_id: u64) {
        self.by_type.update(|set| {
            if !set.remove(&section_id) {
                set.insert(section_id);
            }
        });
    }

    // =========================================================
    // 拖拽
    // =========================================================

    pub fn begin_drag(&self, payload: DragPayload) -> bool {
        self.board.try_update(|b| b.begin(payload)).unwrap_or(false)
    }

    pub fn cancel_drag(&self) {
        self.board.update(DragBoard::cancel);
    }

    /// 当前拖拽是否来自该作用域（决定 dragover 是否允许放置）
    pub fn accepts(&self, scope: ReorderScope) -> bool {
        self.board
            .with_untracked(|b| b.payload().is_some_and(|p| p.scope == scope))
    }

    pub fn is_dragged(&self, item: ItemRef) -> bool {
        self.board.with(|b| b.is_dragged(item))
    }

    pub fn phase(&self, scope: ReorderScope) -> DragPhase {
        self.board.with(|b| b.phase(scope))
    }

    /// 放置：先在本地应用新顺序，再提交服务器并以重新拉取的结果对账
    pub fn drop_on(&self, target: ItemRef, scope: ReorderScope) {
        let result = self.chapters.with_untracked(|chapters| {
            self.board
                .try_update(|b| b.drop_on(target, scope, chapters))
        });
        let plan = match result {
            Some(Ok(plan)) => plan,
            Some(Err(rejection)) => {
                log_info!("[Reorder] Drop on {} ignored: {}", target, rejection);
                return;
            }
            None => return,
        };

        let before = self.chapters.get_untracked();
        let mut optimistic = before.clone();
        plan.apply(&mut optimistic);
        self.chapters.set(optimistic.clone());

        let state = *self;
        let app = self.app();
        spawn_local(async move {
            let reconciled =
                commit_reorder(&app.api, state.course_id, &plan, before, optimistic).await;
            state.chapters.set(reconciled.chapters);
            if let Some(e) = reconciled.error {
                app.toast.error(format!(
                    "{}: {}",
                    app.locale.t("editor.reorder_failed"),
                    app.locale.error_text(&e)
                ));
            }
            state.board.update(|b| b.settle(plan.scope));
        });
    }

    // =========================================================
    // 锁定
    // =========================================================

    pub fn toggle_lock(&self, key: MaterialKey) {
        let Some(toggle) = self
            .chapters
            .try_update(|chapters| LockToggle::begin(chapters, key))
            .flatten()
        else {
            return;
        };

        let state = *self;
        let app = self.app();
        spawn_local(async move {
            let result = toggle.commit(&app.api).await;
            state.chapters.update(|chapters| toggle.finish(chapters, &result));
            if result.is_err() {
                app.toast.error(app.locale.t("editor.lock_failed"));
            }
        });
    }

    // =========================================================
    // 标题 / 删除 / 弹窗
    // =========================================================

    pub fn save_title(&self, target: TitleTarget, draft: TitleDraft) {
        let app = self.app();
        let title = match draft.validate() {
            Ok(title) => title,
            Err(e) => {
                app.report(&e);
                return;
            }
        };

        let state = *self;
        spawn_local(async move {
            let api = &app.api;
            let result: ClientResult<()> = match target {
                TitleTarget::NewChapter => api
                    .send(&CreateChapterRequest {
                        course_id: state.course_id,
                        title,
                    })
                    .await
                    .map(|chapter| state.expanded.update(|set| {
                        set.insert(chapter.id);
                    })),
                TitleTarget::Chapter(chapter_id) => api
                    .send(&UpdateChapterRequest { chapter_id, title })
                    .await
                    .map(drop),
                TitleTarget::NewSection { chapter_id } => api
                    .send(&CreateSectionRequest { chapter_id, title })
                    .await
                    .map(drop),
                TitleTarget::Section(section_id) => api
                    .send(&UpdateSectionRequest { section_id, title })
                    .await
                    .map(drop),
            };
            match result {
                Ok(()) => {
                    state.title_edit.set(None);
                    state.refresh("common.saved").await;
                }
                Err(e) => app.report(&e),
            }
        });
    }

    pub fn request_delete(&self, target: DeleteTarget) {
        self.pending_delete.set(Some(target));
    }

    /// 确认对话框通过后执行删除
    pub fn confirm_delete(&self) {
        let Some(target) = self.pending_delete.get_untracked() else {
            return;
        };
        self.pending_delete.set(None);

        let state = *self;
        let app = self.app();
        spawn_local(async move {
            let api = &app.api;
            let result = match target {
                DeleteTarget::Chapter(chapter_id) => {
                    api.send(&DeleteChapterRequest { chapter_id }).await
                }
                DeleteTarget::Section(section_id) => {
                    api.send(&DeleteSectionRequest { section_id }).await
                }
                DeleteTarget::Video(video_id) => api.send(&DeleteVideoRequest { video_id }).await,
                DeleteTarget::Quiz(quiz_id) => api.send(&DeleteQuizRequest { quiz_id }).await,
                DeleteTarget::Question(question_id) => {
                    api.send(&DeleteQuestionRequest { question_id }).await
                }
            };
            match result {
                Ok(_) => state.refresh("common.deleted").await,
                Err(e) => app.report(&e),
            }
        });
    }

    pub fn open_material(&self, form: MaterialForm) {
        self.material_form.set(Some(form));
        self.modal.update(ModalGuard::open);
    }

    pub fn mark_dirty(&self) {
        self.modal.update(ModalGuard::mark_dirty);
    }

    /// 保存成功：关闭弹窗并刷新结构树
    pub async fn finish_material(&self) {
        self.modal.update(ModalGuard::force_close);
        self.material_form.set(None);
        self.refresh("common.saved").await;
    }
}

pub fn provide_editor(state: EditorState) {
    provide_context(state);
}

pub fn use_editor() -> EditorState {
    use_context::<EditorState>().expect("EditorState should be provided by CourseEditorPage")
}
