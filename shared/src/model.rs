//! 领域模型
//!
//! 字段命名与服务端序列化格式保持一致（snake_case），
//! 金额统一以十进制字符串传输，避免浮点误差。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// 语言 (Language)
// =========================================================

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

/// 文本方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Ar => TextDirection::Rtl,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == TextDirection::Rtl
    }

    /// 在两种语言间切换
    pub fn toggle(&self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }
}

/// 双语名称挑选
fn pick<'a>(language: Language, en: &'a str, ar: &'a str) -> &'a str {
    match language {
        Language::Ar if !ar.is_empty() => ar,
        _ => en,
    }
}

// =========================================================
// 课程结构 (Course Structure)
// =========================================================

/// 章节：拥有按序排列的小节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u64,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// 小节：视频与测验两个独立排序的集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_file_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_locked: bool,
    pub order: i32,
}

impl Video {
    /// 播放地址：优先使用上传文件，其次是外部链接
    pub fn source_url(&self) -> Option<&str> {
        self.video_file_url
            .as_deref()
            .or(self.video_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_locked: bool,
    pub order: i32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Image,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Image => "image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub question_image_url: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub order: i32,
}

impl Question {
    /// 正确选项的下标（服务端保证恰好一个）
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: u64,
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub order: i32,
}

/// 排序更新项（重排请求体）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: u64,
    pub order: i32,
}

/// 锁定状态（锁定切换接口的响应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    pub is_locked: bool,
}

// =========================================================
// 课程 (Course)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_count: u32,
    #[serde(default)]
    pub quiz_count: u32,
}

/// 平台设置（仅用于显示名称）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlatformSettings {
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
}

impl PlatformSettings {
    pub fn display_name(&self, language: Language) -> &str {
        pick(language, &self.name_en, &self.name_ar)
    }
}

// =========================================================
// 用户与会话 (User & Session)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    SchoolStudent,
    UniversityStudent,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub user_type: UserType,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    /// 全名；名字为空时退回邮箱
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.user_type == UserType::Teacher
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

// =========================================================
// 定价 (Pricing)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentType {
    SchoolStudent,
    UniversityStudent,
}

impl StudentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentType::SchoolStudent => "school_student",
            StudentType::UniversityStudent => "university_student",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "school_student" => Some(StudentType::SchoolStudent),
            "university_student" => Some(StudentType::UniversityStudent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub code: String,
}

impl Subject {
    pub fn name(&self, language: Language) -> &str {
        pick(language, &self.name_en, &self.name_ar)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: u64,
    #[serde(default)]
    pub grade_number: i32,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub order: i32,
}

impl Grade {
    pub fn name(&self, language: Language) -> &str {
        pick(language, &self.name_en, &self.name_ar)
    }
}

/// 私教课价格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPrice {
    pub id: u64,
    pub student_type: StudentType,
    pub subject: u64,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub grade: Option<u64>,
    #[serde(default)]
    pub grade_name: Option<String>,
    pub price: String,
}

// =========================================================
// 收款与结算 (Payments)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherPaymentInfo {
    pub id: u64,
    pub bank_name: String,
    #[serde(default)]
    pub account_number: Option<String>,
    pub account_holder_name: String,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub swift_code: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
}

impl TeacherPaymentInfo {
    /// 只显示账号末四位
    pub fn masked_account_number(&self) -> Option<String> {
        let digits: String = self
            .account_number
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if digits.len() < 4 {
            return None;
        }
        let tail: String = digits.chars().skip(digits.chars().count() - 4).collect();
        Some(format!("•••• {}", tail))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutPaymentDetails {
    pub id: u64,
    pub amount: String,
    #[serde(default)]
    pub student: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: u64,
    pub amount: String,
    pub status: PayoutStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transfer_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_details: Option<PayoutPaymentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EarningsSummary {
    pub total_earnings: String,
    pub pending_payouts: String,
    pub paid_payouts: String,
    pub available_for_payout: String,
    #[serde(default)]
    pub total_payments: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_source_prefers_uploaded_file() {
        let mut video = Video {
            id: 1,
            title: "Intro".into(),
            description: String::new(),
            video_url: Some("https://youtu.be/x".into()),
            video_file_url: Some("https://cdn/intro.mp4".into()),
            duration_minutes: 5,
            is_locked: false,
            order: 0,
        };
        assert_eq!(video.source_url(), Some("https://cdn/intro.mp4"));

        video.video_file_url = None;
        assert_eq!(video.source_url(), Some("https://youtu.be/x"));

        video.video_url = Some("  ".into());
        assert_eq!(video.source_url(), None);
    }

    #[test]
    fn test_masked_account_number() {
        let info = TeacherPaymentInfo {
            id: 1,
            bank_name: "Bank".into(),
            account_number: Some("1234 5678 9012".into()),
            account_holder_name: "A".into(),
            iban: None,
            branch_name: None,
            swift_code: None,
            is_verified: false,
            verified_at: None,
        };
        assert_eq!(info.masked_account_number().as_deref(), Some("•••• 9012"));
    }

    #[test]
    fn test_language_direction_and_names() {
        assert!(Language::Ar.is_rtl());
        assert_eq!(Language::from_code("AR"), Some(Language::Ar));
        assert_eq!(Language::En.toggle(), Language::Ar);

        let settings = PlatformSettings {
            name_en: "Manhaj".into(),
            name_ar: String::new(),
        };
        // 阿拉伯语名称缺失时回退英文
        assert_eq!(settings.display_name(Language::Ar), "Manhaj");
    }

    #[test]
    fn test_user_deserializes_with_missing_optionals() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"email":"t@x.io","user_type":"teacher","first_name":"","last_name":""}"#,
        )
        .unwrap();
        assert!(user.is_teacher());
        assert_eq!(user.display_name(), "t@x.io");
    }
}
