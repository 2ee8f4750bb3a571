//! 表单草稿与校验
//!
//! 校验在发出任何请求之前完成，失败时返回 `ClientErrorKind::Validation`，
//! 消息为 i18n 文案键。

use manhaj_shared::protocol::{
    CreateQuizRequest, PriceInput, SavePaymentInfoRequest, UpdateProfileRequest, UpdateQuizRequest,
};
use manhaj_shared::{
    LessonPrice, Question, QuestionType, Quiz, StudentType, TeacherPaymentInfo, User, Video,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::request::{FileUpload, FormPart};

fn required(value: &str, key: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClientError::validation(key))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// 空字符串视为 0 分钟
fn parse_minutes(value: &str) -> ClientResult<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u32>()
        .map_err(|_| ClientError::validation("validation.duration_invalid"))
}

// =========================================================
// 对话框守卫
// =========================================================

/// 危险操作确认：勾选"我了解此操作无法撤销"后才能确认
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmGate {
    acknowledged: bool,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.acknowledged = acknowledged;
    }

    pub fn can_confirm(&self) -> bool {
        self.acknowledged
    }

    /// 确认成功后复位，下一次打开对话框需要重新勾选
    pub fn confirm(&mut self) -> bool {
        let confirmed = self.acknowledged;
        self.acknowledged = false;
        confirmed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Close,
    AskConfirmation,
}

/// 模态框的未保存修改追踪
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalGuard {
    open: bool,
    dirty: bool,
}

impl ModalGuard {
    pub fn open(&mut self) {
        self.open = true;
        self.dirty = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mark_dirty(&mut self) {
        if self.open {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 有未保存的修改时要求确认，否则直接关闭
    pub fn request_close(&mut self) -> CloseDecision {
        if self.open && self.dirty {
            CloseDecision::AskConfirmation
        } else {
            self.force_close();
            CloseDecision::Close
        }
    }

    /// 提交成功或用户确认放弃后使用
    pub fn force_close(&mut self) {
        self.open = false;
        self.dirty = false;
    }
}

// =========================================================
// 章节 / 小节标题
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleDraft {
    pub title: String,
}

impl TitleDraft {
    pub fn validate(&self) -> ClientResult<String> {
        required(&self.title, "validation.title_required")
    }
}

// =========================================================
// 登录
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    /// 返回 (email, password)；密码不做 trim
    pub fn validate(&self) -> ClientResult<(String, String)> {
        let email = required(&self.email, "validation.email_required")?;
        if self.password.is_empty() {
            return Err(ClientError::validation("validation.password_required"));
        }
        Ok((email, self.password.clone()))
    }
}

// =========================================================
// 视频
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub file: Option<FileUpload>,
    pub duration: String,
    pub is_locked: bool,
}

/// 校验通过的视频表单，以 multipart 提交
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPayload {
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file: Option<FileUpload>,
    pub duration_minutes: u32,
    pub is_locked: bool,
}

impl VideoDraft {
    pub fn from_video(video: &Video) -> Self {
        Self {
            title: video.title.clone(),
            description: video.description.clone(),
            video_url: video.video_url.clone().unwrap_or_default(),
            file: None,
            duration: video.duration_minutes.to_string(),
            is_locked: video.is_locked,
        }
    }

    pub fn validate(&self) -> ClientResult<VideoPayload> {
        Ok(VideoPayload {
            title: required(&self.title, "validation.title_required")?,
            description: self.description.trim().to_string(),
            video_url: optional(&self.video_url),
            file: self.file.clone(),
            duration_minutes: parse_minutes(&self.duration)?,
            is_locked: self.is_locked,
        })
    }
}

impl VideoPayload {
    pub fn to_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("title", self.title.as_str()),
            FormPart::text("description", self.description.as_str()),
            FormPart::text("duration_minutes", self.duration_minutes.to_string()),
            FormPart::text("is_locked", self.is_locked.to_string()),
        ];
        if let Some(url) = &self.video_url {
            parts.push(FormPart::text("video_url", url.as_str()));
        }
        if let Some(file) = &self.file {
            parts.push(FormPart::file("video_file", file.clone()));
        }
        parts
    }
}

// =========================================================
// 测验
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPayload {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub is_locked: bool,
}

impl QuizDraft {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            duration: quiz.duration_minutes.to_string(),
            is_locked: quiz.is_locked,
        }
    }

    pub fn validate(&self) -> ClientResult<QuizPayload> {
        Ok(QuizPayload {
            title: required(&self.title, "validation.title_required")?,
            description: self.description.trim().to_string(),
            duration_minutes: parse_minutes(&self.duration)?,
            is_locked: self.is_locked,
        })
    }
}

impl QuizPayload {
    pub fn into_create(self, section_id: u64) -> CreateQuizRequest {
        CreateQuizRequest {
            section_id,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            is_locked: self.is_locked,
        }
    }

    pub fn into_update(self, quiz_id: u64) -> UpdateQuizRequest {
        UpdateQuizRequest {
            quiz_id,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            is_locked: self.is_locked,
        }
    }
}

// =========================================================
// 题目
// =========================================================

/// 选项草稿；`key` 只在客户端使用，保证列表渲染稳定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub key: Uuid,
    pub text: String,
    pub is_correct: bool,
}

impl OptionDraft {
    fn blank() -> Self {
        Self {
            key: Uuid::new_v4(),
            text: String::new(),
            is_correct: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub question_type: QuestionType,
    pub text: String,
    /// 编辑已有图片题时的当前图片
    pub image_url: Option<String>,
    pub image: Option<FileUpload>,
    pub options: Vec<OptionDraft>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPayload {
    pub option_text: String,
    pub is_correct: bool,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPayload {
    pub question_type: QuestionType,
    pub question_text: String,
    pub image: Option<FileUpload>,
    pub options: Vec<OptionPayload>,
    pub order: i32,
}

pub const MIN_OPTIONS: usize = 2;

impl QuestionDraft {
    /// 新题目默认带两个空选项
    pub fn new(order: i32) -> Self {
        Self {
            question_type: QuestionType::Text,
            text: String::new(),
            image_url: None,
            image: None,
            options: vec![OptionDraft::blank(), OptionDraft::blank()],
            order,
        }
    }

    pub fn from_question(question: &Question) -> Self {
        Self {
            question_type: question.question_type,
            text: question.question_text.clone(),
            image_url: question.question_image_url.clone(),
            image: None,
            options: question
                .options
                .iter()
                .map(|o| OptionDraft {
                    key: Uuid::new_v4(),
                    text: o.option_text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
            order: question.order,
        }
    }

    pub fn add_option(&mut self) -> Uuid {
        let option = OptionDraft::blank();
        let key = option.key;
        self.options.push(option);
        key
    }

    /// 不允许删到少于两个选项
    pub fn remove_option(&mut self, key: Uuid) -> bool {
        if self.options.len() <= MIN_OPTIONS {
            return false;
        }
        let before = self.options.len();
        self.options.retain(|o| o.key != key);
        self.options.len() != before
    }

    pub fn set_option_text(&mut self, key: Uuid, text: &str) {
        if let Some(option) = self.options.iter_mut().find(|o| o.key == key) {
            option.text = text.to_string();
        }
    }

    /// 单选：标记一个正确选项会取消其他选项
    pub fn mark_correct(&mut self, key: Uuid) {
        for option in &mut self.options {
            option.is_correct = option.key == key;
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some() || self.image_url.is_some()
    }

    pub fn validate(&self) -> ClientResult<QuestionPayload> {
        let question_text = match self.question_type {
            QuestionType::Text => required(&self.text, "validation.question_text_required")?,
            QuestionType::Image => {
                if !self.has_image() {
                    return Err(ClientError::validation("validation.question_image_required"));
                }
                self.text.trim().to_string()
            }
        };

        if self.options.len() < MIN_OPTIONS {
            return Err(ClientError::validation("validation.options_min"));
        }
        if self.options.iter().any(|o| o.text.trim().is_empty()) {
            return Err(ClientError::validation("validation.option_empty"));
        }
        match self.options.iter().filter(|o| o.is_correct).count() {
            0 => return Err(ClientError::validation("validation.correct_required")),
            1 => {}
            _ => return Err(ClientError::validation("validation.correct_single")),
        }

        Ok(QuestionPayload {
            question_type: self.question_type,
            question_text,
            image: match self.question_type {
                QuestionType::Image => self.image.clone(),
                QuestionType::Text => None,
            },
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(index, o)| OptionPayload {
                    option_text: o.text.trim().to_string(),
                    is_correct: o.is_correct,
                    order: index as i32,
                })
                .collect(),
            order: self.order,
        })
    }
}

impl QuestionPayload {
    /// 选项以 JSON 字符串放在 `options` 字段中
    pub fn to_parts(&self) -> Vec<FormPart> {
        let options = serde_json::to_string(&self.options).unwrap_or_else(|_| "[]".to_string());
        let mut parts = vec![
            FormPart::text("question_type", self.question_type.as_str()),
            FormPart::text("question_text", self.question_text.as_str()),
            FormPart::text("order", self.order.to_string()),
            FormPart::text("options", options),
        ];
        if let Some(image) = &self.image {
            parts.push(FormPart::file("question_image", image.clone()));
        }
        parts
    }
}

// =========================================================
// 收款信息
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentInfoDraft {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder_name: String,
    pub iban: String,
    pub branch_name: String,
    pub swift_code: String,
}

impl PaymentInfoDraft {
    pub fn from_info(info: &TeacherPaymentInfo) -> Self {
        Self {
            bank_name: info.bank_name.clone(),
            account_number: info.account_number.clone().unwrap_or_default(),
            account_holder_name: info.account_holder_name.clone(),
            iban: info.iban.clone().unwrap_or_default(),
            branch_name: info.branch_name.clone().unwrap_or_default(),
            swift_code: info.swift_code.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> ClientResult<SavePaymentInfoRequest> {
        let account_number: String = self
            .account_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Ok(SavePaymentInfoRequest {
            bank_name: required(&self.bank_name, "validation.bank_name_required")?,
            account_number: required(&account_number, "validation.account_number_required")?,
            account_holder_name: required(&self.account_holder_name, "validation.holder_required")?,
            iban: optional(&self.iban).map(|iban| iban.replace(' ', "").to_uppercase()),
            branch_name: optional(&self.branch_name),
            swift_code: optional(&self.swift_code).map(|s| s.to_uppercase()),
        })
    }
}

// =========================================================
// 私教课价格
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceDraft {
    pub student_type: Option<StudentType>,
    pub subject: Option<u64>,
    pub grade: Option<u64>,
    pub price: String,
}

/// 正的十进制金额，最多两位小数
fn parse_price(value: &str) -> Option<String> {
    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits(whole) {
        return None;
    }
    if let Some(fraction) = fraction {
        if !digits(fraction) || fraction.len() > 2 {
            return None;
        }
    }
    value
        .chars()
        .any(|c| ('1'..='9').contains(&c))
        .then(|| value.to_string())
}

impl PriceDraft {
    pub fn from_price(price: &LessonPrice) -> Self {
        Self {
            student_type: Some(price.student_type),
            subject: Some(price.subject),
            grade: price.grade,
            price: price.price.clone(),
        }
    }

    /// 学校学生必须选择年级，大学学生不能有年级
    pub fn validate(&self) -> ClientResult<PriceInput> {
        let student_type = self
            .student_type
            .ok_or_else(|| ClientError::validation("validation.student_type_required"))?;
        let subject = self
            .subject
            .ok_or_else(|| ClientError::validation("validation.subject_required"))?;
        let grade = match (student_type, self.grade) {
            (StudentType::SchoolStudent, None) => {
                return Err(ClientError::validation("validation.grade_required"));
            }
            (StudentType::UniversityStudent, Some(_)) => {
                return Err(ClientError::validation("validation.grade_not_allowed"));
            }
            (_, grade) => grade,
        };
        let price = parse_price(&self.price)
            .ok_or_else(|| ClientError::validation("validation.price_invalid"))?;

        Ok(PriceInput {
            student_type,
            subject,
            grade,
            price,
        })
    }
}

// =========================================================
// 个人资料
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub bio: String,
}

impl ProfileDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self, user_id: u64) -> ClientResult<UpdateProfileRequest> {
        Ok(UpdateProfileRequest {
            user_id,
            first_name: required(&self.first_name, "validation.first_name_required")?,
            last_name: required(&self.last_name, "validation.last_name_required")?,
            phone_number: optional(&self.phone_number),
            bio: optional(&self.bio),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientErrorKind;

    fn key_of(result: ClientResult<impl std::fmt::Debug>) -> String {
        let err = result.unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Validation);
        err.message
    }

    #[test]
    fn test_confirm_gate_tracks_checkbox() {
        let mut gate = ConfirmGate::new();
        assert!(!gate.can_confirm());
        gate.set_acknowledged(true);
        assert!(gate.can_confirm());
        gate.set_acknowledged(false);
        assert!(!gate.can_confirm());
        assert!(!gate.confirm());

        gate.set_acknowledged(true);
        assert!(gate.confirm());
        assert!(!gate.can_confirm());
    }

    #[test]
    fn test_modal_guard_asks_before_discarding() {
        let mut guard = ModalGuard::default();
        guard.open();
        assert_eq!(guard.request_close(), CloseDecision::Close);
        assert!(!guard.is_open());

        guard.open();
        guard.mark_dirty();
        assert_eq!(guard.request_close(), CloseDecision::AskConfirmation);
        assert!(guard.is_open());

        guard.force_close();
        assert!(!guard.is_open());
        assert!(!guard.is_dirty());
    }

    #[test]
    fn test_title_and_duration_validation() {
        let draft = TitleDraft {
            title: "   ".into(),
        };
        assert_eq!(key_of(draft.validate()), "validation.title_required");

        let mut video = VideoDraft {
            title: " Intro ".into(),
            duration: "abc".into(),
            ..Default::default()
        };
        assert_eq!(key_of(video.validate()), "validation.duration_invalid");
        video.duration = String::new();
        let payload = video.validate().unwrap();
        assert_eq!(payload.title, "Intro");
        assert_eq!(payload.duration_minutes, 0);
        assert_eq!(payload.video_url, None);
    }

    #[test]
    fn test_question_requires_two_filled_options_and_one_answer() {
        let mut draft = QuestionDraft::new(0);
        draft.text = "2 + 2 = ?".into();
        assert_eq!(key_of(draft.validate()), "validation.option_empty");

        let first = draft.options[0].key;
        let second = draft.options[1].key;
        draft.set_option_text(first, "4");
        draft.set_option_text(second, "5");
        assert_eq!(key_of(draft.validate()), "validation.correct_required");

        draft.mark_correct(second);
        draft.mark_correct(first);
        let payload = draft.validate().unwrap();
        assert_eq!(
            payload.options,
            vec![
                OptionPayload {
                    option_text: "4".into(),
                    is_correct: true,
                    order: 0
                },
                OptionPayload {
                    option_text: "5".into(),
                    is_correct: false,
                    order: 1
                },
            ]
        );

        // 至少保留两个选项
        assert!(!draft.remove_option(first));
        let third = draft.add_option();
        assert!(draft.remove_option(third));
    }

    #[test]
    fn test_question_rejects_multiple_correct_from_loaded_data() {
        let mut draft = QuestionDraft::new(0);
        draft.text = "Pick".into();
        for option in &mut draft.options {
            option.text = "x".into();
            option.is_correct = true;
        }
        assert_eq!(key_of(draft.validate()), "validation.correct_single");

        draft.options.truncate(1);
        assert_eq!(key_of(draft.validate()), "validation.options_min");
    }

    #[test]
    fn test_image_question_needs_image() {
        let mut draft = QuestionDraft::new(3);
        draft.question_type = QuestionType::Image;
        draft.options[0].text = "A".into();
        draft.options[1].text = "B".into();
        draft.options[1].is_correct = true;
        assert_eq!(key_of(draft.validate()), "validation.question_image_required");

        draft.image = Some(FileUpload {
            name: "q.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1],
        });
        let parts = draft.validate().unwrap().to_parts();
        assert!(parts.contains(&FormPart::text("question_type", "image")));
        assert!(parts.contains(&FormPart::text("order", "3")));
        assert!(parts.iter().any(|p| matches!(p, FormPart::File { name, .. } if name == "question_image")));
    }

    #[test]
    fn test_payment_info_strips_spaces() {
        let draft = PaymentInfoDraft {
            bank_name: "Arab Bank".into(),
            account_number: " 1234 5678 90 ".into(),
            account_holder_name: "Sara Ali".into(),
            iban: "jo94 cbjo 0010".into(),
            ..Default::default()
        };
        let req = draft.validate().unwrap();
        assert_eq!(req.account_number, "1234567890");
        assert_eq!(req.iban.as_deref(), Some("JO94CBJO0010"));
        assert_eq!(req.branch_name, None);

        let empty = PaymentInfoDraft {
            bank_name: "Bank".into(),
            account_number: "   ".into(),
            account_holder_name: "A".into(),
            ..Default::default()
        };
        assert_eq!(key_of(empty.validate()), "validation.account_number_required");
    }

    #[test]
    fn test_price_grade_rules() {
        let mut draft = PriceDraft {
            student_type: Some(StudentType::SchoolStudent),
            subject: Some(1),
            grade: None,
            price: "25".into(),
        };
        assert_eq!(key_of(draft.validate()), "validation.grade_required");

        draft.student_type = Some(StudentType::UniversityStudent);
        draft.grade = Some(4);
        assert_eq!(key_of(draft.validate()), "validation.grade_not_allowed");

        draft.grade = None;
        assert_eq!(draft.validate().unwrap().price, "25");
    }

    #[test]
    fn test_price_must_be_positive_decimal() {
        for bad in ["", "0", "0.00", "-5", "1.234", "abc", ".5", "5."] {
            assert_eq!(parse_price(bad), None, "{:?} should be rejected", bad);
        }
        for good in ["5", "0.5", "12.50", " 40.00 "] {
            assert!(parse_price(good).is_some(), "{:?} should be accepted", good);
        }
    }

    #[test]
    fn test_profile_requires_names() {
        let draft = ProfileDraft {
            first_name: "Omar".into(),
            last_name: String::new(),
            phone_number: " ".into(),
            bio: String::new(),
        };
        assert_eq!(key_of(draft.validate(1)), "validation.last_name_required");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let draft = LoginDraft {
            email: "t@x.io".into(),
            password: String::new(),
        };
        assert_eq!(key_of(draft.validate()), "validation.password_required");
    }
}
