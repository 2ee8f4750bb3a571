//! 课程结构树的查找、规范化与统计

use manhaj_shared::{Chapter, MaterialKey, MaterialKind, Quiz, Section, Video};

/// 将服务器返回的结构树按 `order` 逐层排序（稳定排序）
pub fn normalize(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.sort_by_key(|c| c.order);
    for chapter in &mut chapters {
        chapter.sections.sort_by_key(|s| s.order);
        for section in &mut chapter.sections {
            section.videos.sort_by_key(|v| v.order);
            section.quizzes.sort_by_key(|q| q.order);
            for quiz in &mut section.quizzes {
                quiz.questions.sort_by_key(|q| q.order);
                for question in &mut quiz.questions {
                    question.options.sort_by_key(|o| o.order);
                }
            }
        }
    }
    chapters
}

// =========================================================
// 查找
// =========================================================

pub fn find_chapter_mut(chapters: &mut [Chapter], chapter_id: u64) -> Option<&mut Chapter> {
    chapters.iter_mut().find(|c| c.id == chapter_id)
}

pub fn find_section(chapters: &[Chapter], section_id: u64) -> Option<&Section> {
    chapters
        .iter()
        .flat_map(|c| c.sections.iter())
        .find(|s| s.id == section_id)
}

pub fn find_section_mut(chapters: &mut [Chapter], section_id: u64) -> Option<&mut Section> {
    chapters
        .iter_mut()
        .flat_map(|c| c.sections.iter_mut())
        .find(|s| s.id == section_id)
}

pub fn find_video_mut(chapters: &mut [Chapter], video_id: u64) -> Option<&mut Video> {
    chapters
        .iter_mut()
        .flat_map(|c| c.sections.iter_mut())
        .flat_map(|s| s.videos.iter_mut())
        .find(|v| v.id == video_id)
}

pub fn find_quiz(chapters: &[Chapter], quiz_id: u64) -> Option<&Quiz> {
    chapters
        .iter()
        .flat_map(|c| c.sections.iter())
        .flat_map(|s| s.quizzes.iter())
        .find(|q| q.id == quiz_id)
}

pub fn find_quiz_mut(chapters: &mut [Chapter], quiz_id: u64) -> Option<&mut Quiz> {
    chapters
        .iter_mut()
        .flat_map(|c| c.sections.iter_mut())
        .flat_map(|s| s.quizzes.iter_mut())
        .find(|q| q.id == quiz_id)
}

/// 材料当前的锁定状态；材料不存在时返回 `None`
pub fn material_locked(chapters: &[Chapter], key: MaterialKey) -> Option<bool> {
    let mut sections = chapters.iter().flat_map(|c| c.sections.iter());
    match key.kind {
        MaterialKind::Video => sections
            .find_map(|s| s.videos.iter().find(|v| v.id == key.id))
            .map(|v| v.is_locked),
        MaterialKind::Quiz => sections
            .find_map(|s| s.quizzes.iter().find(|q| q.id == key.id))
            .map(|q| q.is_locked),
    }
}

/// 设置材料的锁定状态，返回材料是否存在
pub fn set_material_locked(chapters: &mut [Chapter], key: MaterialKey, locked: bool) -> bool {
    match key.kind {
        MaterialKind::Video => find_video_mut(chapters, key.id)
            .map(|v| v.is_locked = locked)
            .is_some(),
        MaterialKind::Quiz => find_quiz_mut(chapters, key.id)
            .map(|q| q.is_locked = locked)
            .is_some(),
    }
}

// =========================================================
// 统计
// =========================================================

/// 编辑器顶部的统计数据，每次渲染时从结构树重新推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CourseStats {
    pub chapters: usize,
    pub sections: usize,
    pub videos: usize,
    pub quizzes: usize,
    pub total_minutes: u32,
}

impl CourseStats {
    pub fn from_tree(chapters: &[Chapter]) -> Self {
        let mut stats = CourseStats {
            chapters: chapters.len(),
            ..Default::default()
        };
        for section in chapters.iter().flat_map(|c| c.sections.iter()) {
            stats.sections += 1;
            stats.videos += section.videos.len();
            stats.quizzes += section.quizzes.len();
            stats.total_minutes += section
                .videos
                .iter()
                .map(|v| v.duration_minutes)
                .chain(section.quizzes.iter().map(|q| q.duration_minutes))
                .sum::<u32>();
        }
        stats
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! 测试用结构树
    use manhaj_shared::{Chapter, Quiz, Section, Video};

    pub fn video(id: u64, order: i32) -> Video {
        Video {
            id,
            title: format!("Video {}", id),
            description: String::new(),
            video_url: Some(format!("https://cdn.test/{}.mp4", id)),
            video_file_url: None,
            duration_minutes: 10,
            is_locked: false,
            order,
        }
    }

    pub fn quiz(id: u64, order: i32) -> Quiz {
        Quiz {
            id,
            title: format!("Quiz {}", id),
            description: String::new(),
            duration_minutes: 5,
            is_locked: false,
            order,
            questions: Vec::new(),
        }
    }

    pub fn section(id: u64, order: i32, videos: Vec<Video>, quizzes: Vec<Quiz>) -> Section {
        Section {
            id,
            title: format!("Section {}", id),
            order,
            videos,
            quizzes,
        }
    }

    pub fn chapter(id: u64, order: i32, sections: Vec<Section>) -> Chapter {
        Chapter {
            id,
            title: format!("Chapter {}", id),
            order,
            sections,
        }
    }

    /// 章节 1: 小节 11 [v1(0), q10(0), v2(1)]，小节 12 [q20(0)]
    /// 章节 2: 小节 21 [v3(0)]
    pub fn sample_tree() -> Vec<Chapter> {
        vec![
            chapter(
                1,
                0,
                vec![
                    section(11, 0, vec![video(1, 0), video(2, 1)], vec![quiz(10, 0)]),
                    section(12, 1, Vec::new(), vec![quiz(20, 0)]),
                ],
            ),
            chapter(2, 1, vec![section(21, 0, vec![video(3, 0)], Vec::new())]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_normalize_sorts_every_level() {
        let tree = vec![
            chapter(2, 5, vec![]),
            chapter(
                1,
                1,
                vec![
                    section(8, 3, vec![video(2, 9), video(1, 0)], vec![]),
                    section(7, 0, vec![], vec![quiz(4, 2), quiz(3, 1)]),
                ],
            ),
        ];
        let tree = normalize(tree);
        assert_eq!(tree.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
        let sections = &tree[0].sections;
        assert_eq!(sections.iter().map(|s| s.id).collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(sections[0].quizzes[0].id, 3);
        assert_eq!(sections[1].videos[0].id, 1);
    }

    #[test]
    fn test_lock_lookup_respects_material_kind() {
        let mut tree = sample_tree();
        // 视频 1 与测验 1 不是同一个材料
        assert_eq!(material_locked(&tree, MaterialKey::quiz(1)), None);
        assert!(set_material_locked(&mut tree, MaterialKey::video(1), true));
        assert_eq!(material_locked(&tree, MaterialKey::video(1)), Some(true));
        assert_eq!(material_locked(&tree, MaterialKey::quiz(10)), Some(false));
        assert!(!set_material_locked(&mut tree, MaterialKey::video(99), true));
    }

    #[test]
    fn test_course_stats() {
        let stats = CourseStats::from_tree(&sample_tree());
        assert_eq!(
            stats,
            CourseStats {
                chapters: 2,
                sections: 3,
                videos: 3,
                quizzes: 2,
                total_minutes: 3 * 10 + 2 * 5,
            }
        );
        assert_eq!(CourseStats::from_tree(&[]), CourseStats::default());
    }
}
