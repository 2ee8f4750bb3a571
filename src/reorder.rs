//! 拖拽排序控制器
//!
//! 每个可排序的兄弟列表（`ReorderScope`）都有三个状态：
//!
//! ```text
//! Idle --begin--> Dragging --drop_on--> Resolving --settle--> Idle
//!                    |                      |
//!                    +--cancel / 拒绝-------+--> Idle
//! ```
//!
//! `drop_on` 在任何网络请求之前同步完成：定位、校验、剪切插入、重新编号，
//! 产出 `ReorderPlan`。计划应用到本地（乐观更新）与提交服务器由 `optimistic` 负责。
//! 同一作用域处于 Resolving 时拒绝新的拖拽，两次排序请求不会交错。

use std::collections::HashSet;
use std::fmt;

use manhaj_shared::protocol::{ReorderMaterialsRequest, ReorderRequest};
use manhaj_shared::{Chapter, MaterialKey, MaterialKind, OrderUpdate, Quiz, Section, Video};

pub use manhaj_shared::protocol::ReorderScope;

use crate::structure::{find_chapter_mut, find_section, find_section_mut};

// =========================================================
// 可排序条目
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Chapter,
    Section,
    Video,
    Quiz,
}

/// 条目身份：不同类型的 ID 互不冲突
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: u64,
}

impl ItemRef {
    pub fn chapter(id: u64) -> Self {
        Self {
            kind: ItemKind::Chapter,
            id,
        }
    }

    pub fn section(id: u64) -> Self {
        Self {
            kind: ItemKind::Section,
            id,
        }
    }

    pub fn video(id: u64) -> Self {
        Self {
            kind: ItemKind::Video,
            id,
        }
    }

    pub fn quiz(id: u64) -> Self {
        Self {
            kind: ItemKind::Quiz,
            id,
        }
    }
}

impl From<MaterialKey> for ItemRef {
    fn from(key: MaterialKey) -> Self {
        match key.kind {
            MaterialKind::Video => ItemRef::video(key.id),
            MaterialKind::Quiz => ItemRef::quiz(key.id),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ItemKind::Chapter => "chapter",
            ItemKind::Section => "section",
            ItemKind::Video => "video",
            ItemKind::Quiz => "quiz",
        };
        write!(f, "{}:{}", kind, self.id)
    }
}

/// 带有序号的兄弟条目
pub trait Orderable {
    fn item_ref(&self) -> ItemRef;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

macro_rules! impl_orderable {
    ($ty:ty, $ctor:path) => {
        impl Orderable for $ty {
            fn item_ref(&self) -> ItemRef {
                $ctor(self.id)
            }
            fn order(&self) -> i32 {
                self.order
            }
            fn set_order(&mut self, order: i32) {
                self.order = order;
            }
        }
    };
}

impl_orderable!(Chapter, ItemRef::chapter);
impl_orderable!(Section, ItemRef::section);
impl_orderable!(Video, ItemRef::video);
impl_orderable!(Quiz, ItemRef::quiz);

/// 剪切 `from` 处的条目并插入到 `to`（不是交换，中间条目整体平移一位）
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

// =========================================================
// 作用域
// =========================================================

/// 该作用域接受的条目类型
fn scope_accepts(scope: ReorderScope, kind: ItemKind) -> bool {
    match scope {
        ReorderScope::Chapters { .. } => kind == ItemKind::Chapter,
        ReorderScope::Sections { .. } => kind == ItemKind::Section,
        ReorderScope::Videos { .. } => kind == ItemKind::Video,
        ReorderScope::Quizzes { .. } => kind == ItemKind::Quiz,
        ReorderScope::Materials { .. } => matches!(kind, ItemKind::Video | ItemKind::Quiz),
    }
}

/// 作用域内当前的显示顺序；作用域不存在时返回 `None`
pub fn scope_items(chapters: &[Chapter], scope: ReorderScope) -> Option<Vec<ItemRef>> {
    fn refs<T: Orderable>(items: &[T]) -> Vec<ItemRef> {
        items.iter().map(Orderable::item_ref).collect()
    }

    match scope {
        ReorderScope::Chapters { .. } => Some(refs(chapters)),
        ReorderScope::Sections { chapter_id } => chapters
            .iter()
            .find(|c| c.id == chapter_id)
            .map(|c| refs(&c.sections)),
        ReorderScope::Videos { section_id } => {
            find_section(chapters, section_id).map(|s| refs(&s.videos))
        }
        ReorderScope::Quizzes { section_id } => {
            find_section(chapters, section_id).map(|s| refs(&s.quizzes))
        }
        ReorderScope::Materials { section_id } => find_section(chapters, section_id).map(|s| {
            s.materials()
                .iter()
                .map(|m| ItemRef::from(m.key()))
                .collect()
        }),
    }
}

// =========================================================
// 拖拽状态机
// =========================================================

/// 一次拖拽手势携带的数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub item: ItemRef,
    pub scope: ReorderScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Resolving,
}

/// 放置被拒绝的原因；拒绝时不修改任何状态，也不发出请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// 放在自己身上
    SameItem,
    /// 来自其他作用域（其他小节、其他层级或其他类型列表）
    ScopeMismatch,
    /// 当前没有进行中的拖拽
    NotDragging,
    /// 条目已不在当前列表中
    ItemMissing,
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropRejection::SameItem => "dropped onto itself",
            DropRejection::ScopeMismatch => "scope mismatch",
            DropRejection::NotDragging => "no drag in progress",
            DropRejection::ItemMissing => "item not found in scope",
        };
        f.write_str(text)
    }
}

/// 全部作用域共用的拖拽面板
///
/// 同一时间最多只有一个拖拽手势；Resolving 按作用域分别记录。
#[derive(Debug, Default)]
pub struct DragBoard {
    payload: Option<DragPayload>,
    resolving: HashSet<ReorderScope>,
}

impl DragBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, scope: ReorderScope) -> DragPhase {
        if self.resolving.contains(&scope) {
            DragPhase::Resolving
        } else if self.payload.is_some_and(|p| p.scope == scope) {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn payload(&self) -> Option<DragPayload> {
        self.payload
    }

    /// 条目是否正被拖拽（用于标记拖拽中的行）
    pub fn is_dragged(&self, item: ItemRef) -> bool {
        self.payload.is_some_and(|p| p.item == item)
    }

    /// 开始拖拽；作用域正在 Resolving 时拒绝
    pub fn begin(&mut self, payload: DragPayload) -> bool {
        if self.resolving.contains(&payload.scope) {
            log_warn!(
                "[Reorder] Drag of {} refused: {:?} is still resolving",
                payload.item,
                payload.scope
            );
            return false;
        }
        self.payload = Some(payload);
        true
    }

    pub fn cancel(&mut self) {
        self.payload = None;
    }

    /// 在 `target` 上放置
    ///
    /// 无论成功与否，拖拽数据都会被清除。成功时该作用域进入 Resolving，
    /// 直到调用 `settle`。
    pub fn drop_on(
        &mut self,
        target: ItemRef,
        target_scope: ReorderScope,
        chapters: &[Chapter],
    ) -> Result<ReorderPlan, DropRejection> {
        let payload = self.payload.take().ok_or(DropRejection::NotDragging)?;

        if payload.item == target {
            return Err(DropRejection::SameItem);
        }
        if payload.scope != target_scope || !scope_accepts(target_scope, target.kind) {
            return Err(DropRejection::ScopeMismatch);
        }

        let mut items = scope_items(chapters, payload.scope).ok_or(DropRejection::ItemMissing)?;
        let from = items
            .iter()
            .position(|i| *i == payload.item)
            .ok_or(DropRejection::ItemMissing)?;
        let to = items
            .iter()
            .position(|i| *i == target)
            .ok_or(DropRejection::ItemMissing)?;

        move_item(&mut items, from, to);
        let plan = ReorderPlan {
            scope: payload.scope,
            entries: items
                .into_iter()
                .enumerate()
                .map(|(index, item)| PlannedOrder {
                    item,
                    order: index as i32,
                })
                .collect(),
        };

        self.resolving.insert(payload.scope);
        log_info!(
            "[Reorder] {:?}: moved {} from {} to {} ({} items)",
            payload.scope,
            payload.item,
            from,
            to,
            plan.entries.len()
        );
        Ok(plan)
    }

    /// 服务器往返结束，作用域回到 Idle
    pub fn settle(&mut self, scope: ReorderScope) {
        self.resolving.remove(&scope);
    }
}

// =========================================================
// 排序计划
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedOrder {
    pub item: ItemRef,
    pub order: i32,
}

/// 作用域内全部条目的新序号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub scope: ReorderScope,
    pub entries: Vec<PlannedOrder>,
}

/// 发往服务器的排序请求
#[derive(Debug)]
pub enum ReorderCall {
    List(ReorderRequest),
    Materials(ReorderMaterialsRequest),
}

impl ReorderPlan {
    fn order_of(&self, item: ItemRef) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.item == item)
            .map(|e| e.order)
    }

    fn updates(&self, kind: ItemKind) -> Vec<OrderUpdate> {
        self.entries
            .iter()
            .filter(|e| e.item.kind == kind)
            .map(|e| OrderUpdate {
                id: e.item.id,
                order: e.order,
            })
            .collect()
    }

    /// 把新序号写入本地结构树（乐观更新），返回作用域是否存在
    pub fn apply(&self, chapters: &mut Vec<Chapter>) -> bool {
        match self.scope {
            ReorderScope::Chapters { .. } => {
                self.apply_to(chapters);
                true
            }
            ReorderScope::Sections { chapter_id } => find_chapter_mut(chapters, chapter_id)
                .map(|c| self.apply_to(&mut c.sections))
                .is_some(),
            ReorderScope::Videos { section_id } => find_section_mut(chapters, section_id)
                .map(|s| self.apply_to(&mut s.videos))
                .is_some(),
            ReorderScope::Quizzes { section_id } => find_section_mut(chapters, section_id)
                .map(|s| self.apply_to(&mut s.quizzes))
                .is_some(),
            ReorderScope::Materials { section_id } => find_section_mut(chapters, section_id)
                .map(|s: &mut Section| {
                    self.apply_to(&mut s.videos);
                    self.apply_to(&mut s.quizzes);
                })
                .is_some(),
        }
    }

    fn apply_to<T: Orderable>(&self, items: &mut [T]) {
        for item in items.iter_mut() {
            if let Some(order) = self.order_of(item.item_ref()) {
                item.set_order(order);
            }
        }
        items.sort_by_key(|i| i.order());
    }

    /// 转换为服务器请求；统一材料序列拆回视频与测验两个列表
    pub fn to_call(&self) -> ReorderCall {
        match self.scope {
            ReorderScope::Materials { section_id } => {
                ReorderCall::Materials(ReorderMaterialsRequest {
                    section_id,
                    videos: self.updates(ItemKind::Video),
                    quizzes: self.updates(ItemKind::Quiz),
                })
            }
            scope => ReorderCall::List(ReorderRequest {
                scope,
                items: self
                    .entries
                    .iter()
                    .map(|e| OrderUpdate {
                        id: e.item.id,
                        order: e.order,
                    })
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::fixtures::*;

    fn materials(chapters: &[Chapter], section_id: u64) -> Vec<(ItemRef, i32)> {
        find_section(chapters, section_id)
            .unwrap()
            .materials()
            .iter()
            .map(|m| (ItemRef::from(m.key()), m.order()))
            .collect()
    }

    #[test]
    fn test_move_item_is_splice_not_swap() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_item(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        move_item(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_unified_drag_moves_video_before_video() {
        let mut tree = sample_tree();
        let scope = ReorderScope::Materials { section_id: 11 };
        let mut board = DragBoard::new();

        assert!(board.begin(DragPayload {
            item: ItemRef::video(2),
            scope,
        }));
        assert_eq!(board.phase(scope), DragPhase::Dragging);

        let plan = board.drop_on(ItemRef::video(1), scope, &tree).unwrap();
        assert_eq!(board.phase(scope), DragPhase::Resolving);
        assert!(plan.apply(&mut tree));

        assert_eq!(
            materials(&tree, 11),
            vec![
                (ItemRef::video(2), 0),
                (ItemRef::video(1), 1),
                (ItemRef::quiz(10), 2)
            ]
        );

        match plan.to_call() {
            ReorderCall::Materials(req) => {
                assert_eq!(
                    req.videos,
                    vec![OrderUpdate { id: 2, order: 0 }, OrderUpdate { id: 1, order: 1 }]
                );
                assert_eq!(req.quizzes, vec![OrderUpdate { id: 10, order: 2 }]);
            }
            other => panic!("unexpected call {:?}", other),
        }

        board.settle(scope);
        assert_eq!(board.phase(scope), DragPhase::Idle);
    }

    #[test]
    fn test_ordinals_are_contiguous_after_drop() {
        let mut tree = vec![
            chapter(1, 4, vec![]),
            chapter(2, 9, vec![]),
            chapter(3, 17, vec![]),
        ];
        let scope = ReorderScope::Chapters { course_id: 5 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::chapter(1),
            scope,
        });
        let plan = board.drop_on(ItemRef::chapter(3), scope, &tree).unwrap();
        plan.apply(&mut tree);

        let ids: Vec<u64> = tree.iter().map(|c| c.id).collect();
        let orders: Vec<i32> = tree.iter().map(|c| c.order).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let tree = sample_tree();
        let scope = ReorderScope::Videos { section_id: 11 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::video(1),
            scope,
        });

        assert_eq!(
            board.drop_on(ItemRef::video(1), scope, &tree),
            Err(DropRejection::SameItem)
        );
        assert_eq!(board.phase(scope), DragPhase::Idle);
        assert_eq!(tree, sample_tree());
    }

    #[test]
    fn test_drop_across_scopes_is_rejected() {
        let tree = sample_tree();
        let mut board = DragBoard::new();

        // 其他小节
        board.begin(DragPayload {
            item: ItemRef::video(1),
            scope: ReorderScope::Videos { section_id: 11 },
        });
        assert_eq!(
            board.drop_on(
                ItemRef::video(3),
                ReorderScope::Videos { section_id: 21 },
                &tree
            ),
            Err(DropRejection::ScopeMismatch)
        );

        // 视频放到只含测验的列表
        board.begin(DragPayload {
            item: ItemRef::video(1),
            scope: ReorderScope::Videos { section_id: 11 },
        });
        assert_eq!(
            board.drop_on(
                ItemRef::quiz(10),
                ReorderScope::Quizzes { section_id: 11 },
                &tree
            ),
            Err(DropRejection::ScopeMismatch)
        );

        // 章节放到小节上
        board.begin(DragPayload {
            item: ItemRef::chapter(1),
            scope: ReorderScope::Chapters { course_id: 1 },
        });
        assert_eq!(
            board.drop_on(
                ItemRef::section(12),
                ReorderScope::Sections { chapter_id: 1 },
                &tree
            ),
            Err(DropRejection::ScopeMismatch)
        );

        assert_eq!(
            board.drop_on(
                ItemRef::section(12),
                ReorderScope::Sections { chapter_id: 1 },
                &tree
            ),
            Err(DropRejection::NotDragging)
        );
    }

    #[test]
    fn test_resolving_scope_refuses_new_drag() {
        let tree = sample_tree();
        let scope = ReorderScope::Sections { chapter_id: 1 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::section(12),
            scope,
        });
        board.drop_on(ItemRef::section(11), scope, &tree).unwrap();

        assert!(!board.begin(DragPayload {
            item: ItemRef::section(11),
            scope,
        }));
        // 其他作用域不受影响
        assert!(board.begin(DragPayload {
            item: ItemRef::chapter(2),
            scope: ReorderScope::Chapters { course_id: 1 },
        }));

        board.settle(scope);
        board.cancel();
        assert!(board.begin(DragPayload {
            item: ItemRef::section(11),
            scope,
        }));
    }

    #[test]
    fn test_cross_type_drop_within_materials() {
        let mut tree = sample_tree();
        let scope = ReorderScope::Materials { section_id: 11 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::quiz(10),
            scope,
        });
        let plan = board.drop_on(ItemRef::video(2), scope, &tree).unwrap();
        plan.apply(&mut tree);

        assert_eq!(
            materials(&tree, 11),
            vec![
                (ItemRef::video(1), 0),
                (ItemRef::video(2), 1),
                (ItemRef::quiz(10), 2)
            ]
        );
    }

    #[test]
    fn test_single_type_plan_targets_list_endpoint() {
        let tree = sample_tree();
        let scope = ReorderScope::Videos { section_id: 11 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::video(1),
            scope,
        });
        let plan = board.drop_on(ItemRef::video(2), scope, &tree).unwrap();
        match plan.to_call() {
            ReorderCall::List(req) => {
                assert_eq!(req.scope, scope);
                assert_eq!(
                    req.items,
                    vec![OrderUpdate { id: 2, order: 0 }, OrderUpdate { id: 1, order: 1 }]
                );
            }
            other => panic!("unexpected call {:?}", other),
        }
    }
}
