//! 课程播放：展开结构树、导航游标与进度持久化

use manhaj_shared::{
    Chapter, CourseId, MaterialItem, MaterialKey, MaterialKind, STORAGE_PROGRESS_PREFIX,
};
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::storage::KeyValueStore;

/// 展开序列中的一项，附带所属章节与小节（侧边栏与标题使用）
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEntry {
    pub chapter_id: u64,
    pub chapter_title: String,
    pub section_id: u64,
    pub section_title: String,
    pub item: MaterialItem,
}

impl PlaybackEntry {
    pub fn key(&self) -> MaterialKey {
        self.item.key()
    }

    pub fn question_count(&self) -> usize {
        match &self.item {
            MaterialItem::Quiz(quiz) => quiz.questions.len(),
            MaterialItem::Video(_) => 0,
        }
    }
}

/// 章节 → 小节 → 统一材料序列，逐层按 `order` 升序展开为一条序列
pub fn flatten(chapters: &[Chapter]) -> Vec<PlaybackEntry> {
    let mut chapters: Vec<&Chapter> = chapters.iter().collect();
    chapters.sort_by_key(|c| c.order);

    let mut entries = Vec::new();
    for chapter in chapters {
        let mut sections: Vec<_> = chapter.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        for section in sections {
            entries.extend(section.materials().into_iter().map(|item| PlaybackEntry {
                chapter_id: chapter.id,
                chapter_title: chapter.title.clone(),
                section_id: section.id,
                section_title: section.title.clone(),
                item,
            }));
        }
    }
    entries
}

// =========================================================
// 持久化格式
// =========================================================

/// 本地存储中的播放进度，键为 `manhaj_progress_<course_id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackProgress {
    #[serde(default)]
    pub material_id: Option<u64>,
    #[serde(default)]
    pub material_type: Option<MaterialKind>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub question_index: usize,
}

impl PlaybackProgress {
    fn key(&self) -> Option<MaterialKey> {
        Some(MaterialKey {
            kind: self.material_type?,
            id: self.material_id?,
        })
    }
}

pub fn progress_key(course_id: CourseId) -> String {
    format!("{}{}", STORAGE_PROGRESS_PREFIX, course_id)
}

pub fn save_progress(
    store: &impl KeyValueStore,
    course_id: CourseId,
    progress: &PlaybackProgress,
) -> ClientResult<()> {
    let json = serde_json::to_string(progress)?;
    store.set(&progress_key(course_id), &json)
}

/// 读取进度；内容无法解析时记录日志并视为没有进度
pub fn load_progress(store: &impl KeyValueStore, course_id: CourseId) -> Option<PlaybackProgress> {
    let raw = store.get(&progress_key(course_id))?;
    match serde_json::from_str(&raw) {
        Ok(progress) => Some(progress),
        Err(e) => {
            log_warn!(
                "[Playback] Ignoring malformed progress for course {}: {}",
                course_id,
                e
            );
            None
        }
    }
}

// =========================================================
// 游标
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackCursor {
    index: usize,
    question_index: usize,
}

impl PlaybackCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn current<'a>(&self, entries: &'a [PlaybackEntry]) -> Option<&'a PlaybackEntry> {
        entries.get(self.index)
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    /// 跨越小节与章节边界；切换条目时题号归零
    pub fn next(&mut self, len: usize) -> bool {
        if !self.has_next(len) {
            return false;
        }
        self.index += 1;
        self.question_index = 0;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.index -= 1;
        self.question_index = 0;
        true
    }

    pub fn select(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        if index != self.index {
            self.index = index;
            self.question_index = 0;
        }
        true
    }

    /// 仅在当前条目是测验且题号在范围内时生效
    pub fn set_question(&mut self, question_index: usize, entries: &[PlaybackEntry]) -> bool {
        let count = self.current(entries).map_or(0, PlaybackEntry::question_count);
        if question_index >= count {
            return false;
        }
        self.question_index = question_index;
        true
    }

    /// 当前状态的持久化形式；序列为空时返回 `None`
    pub fn progress(&self, entries: &[PlaybackEntry]) -> Option<PlaybackProgress> {
        let entry = self.current(entries)?;
        let key = entry.key();
        Some(PlaybackProgress {
            material_id: Some(key.id),
            material_type: Some(key.kind),
            index: self.index,
            question_index: self.question_index,
        })
    }

    /// 按持久化进度恢复游标
    ///
    /// - 记录了材料身份且仍存在：使用它在新序列中的位置
    /// - 记录了材料身份但已不存在：回到第一项
    /// - 没有材料身份：使用记录的位置（越界时回到第一项）
    ///
    /// 题号只在恢复到同一个测验且不越界时保留。
    pub fn restore(entries: &[PlaybackEntry], progress: Option<&PlaybackProgress>) -> Self {
        let Some(progress) = progress else {
            return Self::default();
        };

        let index = match progress.key() {
            Some(key) => match entries.iter().position(|e| e.key() == key) {
                Some(found) => found,
                None => {
                    log_info!(
                        "[Playback] {}:{} no longer exists, starting from the beginning",
                        key.kind.as_str(),
                        key.id
                    );
                    return Self::default();
                }
            },
            None if progress.index < entries.len() => progress.index,
            None => return Self::default(),
        };

        let entry = &entries[index];
        let question_index = if progress.key() == Some(entry.key())
            && entry.key().kind == MaterialKind::Quiz
            && progress.question_index < entry.question_count()
        {
            progress.question_index
        } else {
            0
        };

        log_info!(
            "[Playback] Restored position {} (question {})",
            index,
            question_index
        );
        Self {
            index,
            question_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::structure::fixtures::*;
    use manhaj_shared::{Question, QuestionType};

    fn question(id: u64, order: i32) -> Question {
        Question {
            id,
            question_text: format!("Q{}", id),
            question_type: QuestionType::Text,
            question_image_url: None,
            options: Vec::new(),
            order,
        }
    }

    /// 章节 1: 小节 11 [v1, q7(3 题)]；章节 2: 小节 21 [v3]
    fn course() -> Vec<Chapter> {
        let mut q7 = quiz(7, 1);
        q7.questions = vec![question(1, 0), question(2, 1), question(3, 2)];
        vec![
            chapter(2, 1, vec![section(21, 0, vec![video(3, 0)], Vec::new())]),
            chapter(1, 0, vec![section(11, 0, vec![video(1, 0)], vec![q7])]),
        ]
    }

    fn keys(entries: &[PlaybackEntry]) -> Vec<MaterialKey> {
        entries.iter().map(PlaybackEntry::key).collect()
    }

    #[test]
    fn test_flatten_crosses_chapters_in_order() {
        let entries = flatten(&course());
        assert_eq!(
            keys(&entries),
            vec![MaterialKey::video(1), MaterialKey::quiz(7), MaterialKey::video(3)]
        );
        assert_eq!(entries[2].chapter_id, 2);
        assert_eq!(entries[1].section_title, "Section 11");
    }

    #[test]
    fn test_restore_quiz_and_question() {
        let entries = flatten(&course());
        let progress = PlaybackProgress {
            material_id: Some(7),
            material_type: Some(MaterialKind::Quiz),
            index: 0,
            question_index: 2,
        };
        let cursor = PlaybackCursor::restore(&entries, Some(&progress));
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.question_index(), 2);
    }

    #[test]
    fn test_restore_missing_material_starts_at_zero() {
        let mut tree = course();
        tree[1].sections[0].quizzes.clear();
        let entries = flatten(&tree);
        let progress = PlaybackProgress {
            material_id: Some(7),
            material_type: Some(MaterialKind::Quiz),
            index: 1,
            question_index: 2,
        };
        let cursor = PlaybackCursor::restore(&entries, Some(&progress));
        assert_eq!(cursor, PlaybackCursor::default());
    }

    #[test]
    fn test_restore_prefers_fresh_index_and_drops_stale_question() {
        let entries = flatten(&course());
        // 视频 3 之前位于 0，现在位于 2；视频没有题号
        let progress = PlaybackProgress {
            material_id: Some(3),
            material_type: Some(MaterialKind::Video),
            index: 0,
            question_index: 1,
        };
        let cursor = PlaybackCursor::restore(&entries, Some(&progress));
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.question_index(), 0);

        // 题号越界
        let progress = PlaybackProgress {
            material_id: Some(7),
            material_type: Some(MaterialKind::Quiz),
            index: 1,
            question_index: 5,
        };
        assert_eq!(PlaybackCursor::restore(&entries, Some(&progress)).question_index(), 0);
    }

    #[test]
    fn test_restore_without_identity_uses_index() {
        let entries = flatten(&course());
        let mut progress = PlaybackProgress {
            material_id: None,
            material_type: None,
            index: 2,
            question_index: 0,
        };
        assert_eq!(PlaybackCursor::restore(&entries, Some(&progress)).index(), 2);
        progress.index = 9;
        assert_eq!(PlaybackCursor::restore(&entries, Some(&progress)).index(), 0);
        assert_eq!(PlaybackCursor::restore(&entries, None).index(), 0);
    }

    #[test]
    fn test_navigation() {
        let entries = flatten(&course());
        let len = entries.len();
        let mut cursor = PlaybackCursor::default();
        assert!(!cursor.has_previous());
        assert!(!cursor.set_question(1, &entries));

        assert!(cursor.next(len));
        assert!(cursor.set_question(2, &entries));
        assert!(!cursor.set_question(3, &entries));

        assert!(cursor.next(len));
        assert_eq!(cursor.question_index(), 0);
        assert!(!cursor.next(len));
        assert!(!cursor.has_next(len));

        assert!(cursor.previous());
        assert_eq!(cursor.index(), 1);
        assert!(!cursor.select(3, len));
        assert!(cursor.select(0, len));
        assert_eq!(cursor.current(&entries).unwrap().key(), MaterialKey::video(1));
    }

    #[test]
    fn test_progress_round_trip_through_store() {
        let store = MemoryStore::new();
        let entries = flatten(&course());
        let mut cursor = PlaybackCursor::default();
        cursor.next(entries.len());
        cursor.set_question(1, &entries);

        let progress = cursor.progress(&entries).unwrap();
        save_progress(&store, 42, &progress).unwrap();

        let raw = store.get("manhaj_progress_42").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "materialId": 7,
                "materialType": "quiz",
                "index": 1,
                "questionIndex": 1
            })
        );

        let loaded = load_progress(&store, 42).unwrap();
        assert_eq!(PlaybackCursor::restore(&entries, Some(&loaded)), cursor);
        assert!(load_progress(&store, 43).is_none());
    }

    #[test]
    fn test_malformed_progress_is_ignored() {
        let store = MemoryStore::new();
        store.set(&progress_key(5), "{not json").unwrap();
        assert!(load_progress(&store, 5).is_none());
    }
}
