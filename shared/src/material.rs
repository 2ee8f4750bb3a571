//! 统一学习材料序列
//!
//! 小节内的视频与测验各自独立排序，显示与拖拽时需要合并为一条序列。
//! 合并结果不持久化，每次由小节数据重新推导。
//!
//! 合并规则：按各自的 `order` 升序；`order` 相同时视频排在测验之前，
//! 其余情况保持输入顺序（稳定排序）。

use serde::{Deserialize, Serialize};

use crate::model::{Quiz, Section, Video};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Video,
    Quiz,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Video => "video",
            MaterialKind::Quiz => "quiz",
        }
    }
}

/// 材料身份：视频与测验的 ID 属于不同的命名空间，必须连同类型一起比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialKey {
    pub kind: MaterialKind,
    pub id: u64,
}

impl MaterialKey {
    pub fn video(id: u64) -> Self {
        Self {
            kind: MaterialKind::Video,
            id,
        }
    }

    pub fn quiz(id: u64) -> Self {
        Self {
            kind: MaterialKind::Quiz,
            id,
        }
    }
}

/// 视频或测验
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialItem {
    Video(Video),
    Quiz(Quiz),
}

impl MaterialItem {
    pub fn key(&self) -> MaterialKey {
        match self {
            MaterialItem::Video(v) => MaterialKey::video(v.id),
            MaterialItem::Quiz(q) => MaterialKey::quiz(q.id),
        }
    }

    pub fn kind(&self) -> MaterialKind {
        self.key().kind
    }

    pub fn id(&self) -> u64 {
        self.key().id
    }

    pub fn order(&self) -> i32 {
        match self {
            MaterialItem::Video(v) => v.order,
            MaterialItem::Quiz(q) => q.order,
        }
    }

    pub fn set_order(&mut self, order: i32) {
        match self {
            MaterialItem::Video(v) => v.order = order,
            MaterialItem::Quiz(q) => q.order = order,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MaterialItem::Video(v) => &v.title,
            MaterialItem::Quiz(q) => &q.title,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self {
            MaterialItem::Video(v) => v.duration_minutes,
            MaterialItem::Quiz(q) => q.duration_minutes,
        }
    }

    pub fn is_locked(&self) -> bool {
        match self {
            MaterialItem::Video(v) => v.is_locked,
            MaterialItem::Quiz(q) => q.is_locked,
        }
    }
}

/// 合并视频与测验为统一序列
pub fn merge_materials(videos: &[Video], quizzes: &[Quiz]) -> Vec<MaterialItem> {
    let mut items: Vec<MaterialItem> = videos
        .iter()
        .cloned()
        .map(MaterialItem::Video)
        .chain(quizzes.iter().cloned().map(MaterialItem::Quiz))
        .collect();
    // sort_by_key 是稳定排序：视频先入列，同序号时自然排在测验之前
    items.sort_by_key(|item| item.order());
    items
}

impl Section {
    /// 小节的统一材料序列
    pub fn materials(&self) -> Vec<MaterialItem> {
        merge_materials(&self.videos, &self.quizzes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: u64, order: i32) -> Video {
        Video {
            id,
            title: format!("video {}", id),
            description: String::new(),
            video_url: None,
            video_file_url: None,
            duration_minutes: 10,
            is_locked: false,
            order,
        }
    }

    fn quiz(id: u64, order: i32) -> Quiz {
        Quiz {
            id,
            title: format!("quiz {}", id),
            description: String::new(),
            duration_minutes: 5,
            is_locked: false,
            order,
            questions: Vec::new(),
        }
    }

    fn keys(items: &[MaterialItem]) -> Vec<MaterialKey> {
        items.iter().map(|i| i.key()).collect()
    }

    #[test]
    fn test_merge_places_video_before_quiz_on_tie() {
        let videos = vec![video(1, 0), video(2, 1)];
        let quizzes = vec![quiz(10, 0)];

        let merged = merge_materials(&videos, &quizzes);
        assert_eq!(
            keys(&merged),
            vec![
                MaterialKey::video(1),
                MaterialKey::quiz(10),
                MaterialKey::video(2)
            ]
        );
    }

    #[test]
    fn test_merge_keeps_every_item_exactly_once() {
        let videos = vec![video(3, 4), video(1, 0), video(2, 2)];
        let quizzes = vec![quiz(7, 1), quiz(8, 3), quiz(9, 9)];

        let merged = merge_materials(&videos, &quizzes);
        assert_eq!(merged.len(), videos.len() + quizzes.len());

        let mut seen = keys(&merged);
        seen.sort_by_key(|k| (k.kind, k.id));
        seen.dedup();
        assert_eq!(seen.len(), 6);

        let orders: Vec<i32> = merged.iter().map(|m| m.order()).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4, 9]);
    }

    #[test]
    fn test_merge_is_stable_under_recomputation() {
        let videos = vec![video(1, 2), video(2, 2)];
        let quizzes = vec![quiz(1, 2), quiz(5, 0)];

        let first = merge_materials(&videos, &quizzes);
        let second = merge_materials(&videos, &quizzes);
        assert_eq!(first, second);
        // 同 ID 的视频与测验是不同材料
        assert_ne!(first[1].key(), first[3].key());
    }

    #[test]
    fn test_section_materials_with_empty_collections() {
        let section = Section {
            id: 1,
            title: "Empty".into(),
            order: 0,
            videos: Vec::new(),
            quizzes: Vec::new(),
        };
        assert!(section.materials().is_empty());
    }
}
