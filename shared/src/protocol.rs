use crate::model::*;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Mutating requests must carry the CSRF header.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters are marked `#[serde(skip)]` so they never leak into the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base.
    fn path(&self) -> String;
}

/// 不关心响应体的端点：任何 2xx 响应体（包括空体和 `{"detail": ...}`）都视为成功
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack;

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer).map(|_| Ack)
    }
}

// =========================================================
// Auth & platform
// =========================================================

#[derive(Debug, Serialize)]
pub struct CsrfRequest;

impl ApiRequest for CsrfRequest {
    type Response = CsrfToken;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/auth/csrf/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/auth/login/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/auth/logout/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/auth/user/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct PlatformSettingsRequest;

impl ApiRequest for PlatformSettingsRequest {
    type Response = PlatformSettings;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/platform-settings/".to_string()
    }
}

/// Update the signed-in user's profile fields
#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip)]
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        user_path(self.user_id)
    }
}

pub fn user_path(user_id: u64) -> String {
    format!("/api/users/{}/", user_id)
}

// =========================================================
// Courses & structure
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListCoursesRequest;

impl ApiRequest for ListCoursesRequest {
    type Response = Vec<CourseSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/courses/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDetailRequest {
    #[serde(skip)]
    pub course_id: u64,
}

impl ApiRequest for CourseDetailRequest {
    type Response = CourseSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/courses/{}/", self.course_id)
    }
}

/// Nested chapters -> sections -> videos / quizzes
#[derive(Debug, Serialize)]
pub struct CourseStructureRequest {
    #[serde(skip)]
    pub course_id: u64,
}

impl ApiRequest for CourseStructureRequest {
    type Response = Vec<Chapter>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/courses/{}/structure/", self.course_id)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateChapterRequest {
    #[serde(skip)]
    pub course_id: u64,
    pub title: String,
}

impl ApiRequest for CreateChapterRequest {
    type Response = Chapter;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/courses/{}/chapters/", self.course_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateChapterRequest {
    #[serde(skip)]
    pub chapter_id: u64,
    pub title: String,
}

impl ApiRequest for UpdateChapterRequest {
    type Response = Chapter;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/chapters/{}/", self.chapter_id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteChapterRequest {
    #[serde(skip)]
    pub chapter_id: u64,
}

impl ApiRequest for DeleteChapterRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/chapters/{}/", self.chapter_id)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateSectionRequest {
    #[serde(skip)]
    pub chapter_id: u64,
    pub title: String,
}

impl ApiRequest for CreateSectionRequest {
    type Response = Section;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/chapters/{}/sections/", self.chapter_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateSectionRequest {
    #[serde(skip)]
    pub section_id: u64,
    pub title: String,
}

impl ApiRequest for UpdateSectionRequest {
    type Response = Section;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/sections/{}/", self.section_id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteSectionRequest {
    #[serde(skip)]
    pub section_id: u64,
}

impl ApiRequest for DeleteSectionRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/sections/{}/", self.section_id)
    }
}

// Video create / update go through multipart uploads, see `video_collection_path`.

pub fn video_collection_path(section_id: u64) -> String {
    format!("/api/sections/{}/videos/", section_id)
}

pub fn video_path(video_id: u64) -> String {
    format!("/api/videos/{}/", video_id)
}

#[derive(Debug, Serialize)]
pub struct DeleteVideoRequest {
    #[serde(skip)]
    pub video_id: u64,
}

impl ApiRequest for DeleteVideoRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        video_path(self.video_id)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateQuizRequest {
    #[serde(skip)]
    pub section_id: u64,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub is_locked: bool,
}

impl ApiRequest for CreateQuizRequest {
    type Response = Quiz;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/sections/{}/quizzes/", self.section_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateQuizRequest {
    #[serde(skip)]
    pub quiz_id: u64,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub is_locked: bool,
}

impl ApiRequest for UpdateQuizRequest {
    type Response = Quiz;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/quizzes/{}/", self.quiz_id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteQuizRequest {
    #[serde(skip)]
    pub quiz_id: u64,
}

impl ApiRequest for DeleteQuizRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/quizzes/{}/", self.quiz_id)
    }
}

pub fn question_collection_path(quiz_id: u64) -> String {
    format!("/api/quizzes/{}/questions/", quiz_id)
}

pub fn question_path(question_id: u64) -> String {
    format!("/api/questions/{}/", question_id)
}

#[derive(Debug, Serialize)]
pub struct DeleteQuestionRequest {
    #[serde(skip)]
    pub question_id: u64,
}

impl ApiRequest for DeleteQuestionRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        question_path(self.question_id)
    }
}

/// Lock or unlock a single video / quiz
#[derive(Debug, Serialize)]
pub struct ToggleLockRequest {
    #[serde(skip)]
    pub kind: crate::MaterialKind,
    #[serde(skip)]
    pub id: u64,
    pub is_locked: bool,
}

impl ApiRequest for ToggleLockRequest {
    type Response = LockState;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        match self.kind {
            crate::MaterialKind::Video => format!("/api/videos/{}/toggle-lock/", self.id),
            crate::MaterialKind::Quiz => format!("/api/quizzes/{}/toggle-lock/", self.id),
        }
    }
}

// =========================================================
// Reordering
// =========================================================

/// One reorderable sibling list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReorderScope {
    Chapters { course_id: u64 },
    Sections { chapter_id: u64 },
    Videos { section_id: u64 },
    Quizzes { section_id: u64 },
    /// Videos and quizzes of one section as a single merged list
    Materials { section_id: u64 },
}

impl ReorderScope {
    pub fn reorder_path(&self) -> String {
        match self {
            ReorderScope::Chapters { course_id } => {
                format!("/api/courses/{}/chapters/reorder/", course_id)
            }
            ReorderScope::Sections { chapter_id } => {
                format!("/api/chapters/{}/sections/reorder/", chapter_id)
            }
            ReorderScope::Videos { section_id } => {
                format!("/api/sections/{}/videos/reorder/", section_id)
            }
            ReorderScope::Quizzes { section_id } => {
                format!("/api/sections/{}/quizzes/reorder/", section_id)
            }
            ReorderScope::Materials { section_id } => {
                format!("/api/sections/{}/materials/reorder/", section_id)
            }
        }
    }
}

/// Full `{id, order}` list for a single-type scope
#[derive(Debug, Serialize)]
pub struct ReorderRequest {
    #[serde(skip)]
    pub scope: ReorderScope,
    pub items: Vec<OrderUpdate>,
}

impl ApiRequest for ReorderRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        self.scope.reorder_path()
    }
}

/// Unified material order split back into per-type lists
#[derive(Debug, Serialize)]
pub struct ReorderMaterialsRequest {
    #[serde(skip)]
    pub section_id: u64,
    pub videos: Vec<OrderUpdate>,
    pub quizzes: Vec<OrderUpdate>,
}

impl ApiRequest for ReorderMaterialsRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        ReorderScope::Materials {
            section_id: self.section_id,
        }
        .reorder_path()
    }
}

// =========================================================
// Pricing
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListPricesRequest;

impl ApiRequest for ListPricesRequest {
    type Response = Vec<LessonPrice>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/private-lesson-prices/".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceInput {
    pub student_type: StudentType,
    pub subject: u64,
    pub grade: Option<u64>,
    pub price: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePriceRequest {
    #[serde(flatten)]
    pub input: PriceInput,
}

impl ApiRequest for CreatePriceRequest {
    type Response = LessonPrice;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/private-lesson-prices/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatePriceRequest {
    #[serde(skip)]
    pub price_id: u64,
    #[serde(flatten)]
    pub input: PriceInput,
}

impl ApiRequest for UpdatePriceRequest {
    type Response = LessonPrice;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/private-lesson-prices/{}/", self.price_id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeletePriceRequest {
    #[serde(skip)]
    pub price_id: u64,
}

impl ApiRequest for DeletePriceRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/private-lesson-prices/{}/", self.price_id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListSubjectsRequest;

impl ApiRequest for ListSubjectsRequest {
    type Response = Vec<Subject>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/subjects/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListGradesRequest;

impl ApiRequest for ListGradesRequest {
    type Response = Vec<Grade>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/grades/".to_string()
    }
}

// =========================================================
// Payments
// =========================================================

#[derive(Debug, Serialize)]
pub struct GetPaymentInfoRequest;

impl ApiRequest for GetPaymentInfoRequest {
    type Response = Vec<TeacherPaymentInfo>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/payments/teacher-payment-info/".to_string()
    }
}

/// The server creates the record on first save and updates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePaymentInfoRequest {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder_name: String,
    pub iban: Option<String>,
    pub branch_name: Option<String>,
    pub swift_code: Option<String>,
}

impl ApiRequest for SavePaymentInfoRequest {
    type Response = TeacherPaymentInfo;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/payments/teacher-payment-info/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListPayoutsRequest;

impl ApiRequest for ListPayoutsRequest {
    type Response = Vec<Payout>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/payments/payouts/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct EarningsRequest;

impl ApiRequest for EarningsRequest {
    type Response = EarningsSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/payments/payments/my_earnings/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params_stay_out_of_body() {
        let req = CreateChapterRequest {
            course_id: 42,
            title: "Basics".into(),
        };
        assert_eq!(req.path(), "/api/courses/42/chapters/");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "title": "Basics" })
        );
    }

    #[test]
    fn test_reorder_paths_per_scope() {
        let req = ReorderRequest {
            scope: ReorderScope::Quizzes { section_id: 9 },
            items: vec![OrderUpdate { id: 1, order: 0 }],
        };
        assert_eq!(req.path(), "/api/sections/9/quizzes/reorder/");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "items": [{ "id": 1, "order": 0 }] })
        );

        let materials = ReorderMaterialsRequest {
            section_id: 9,
            videos: Vec::new(),
            quizzes: Vec::new(),
        };
        assert_eq!(materials.path(), "/api/sections/9/materials/reorder/");
    }

    #[test]
    fn test_toggle_lock_path_depends_on_kind() {
        let req = ToggleLockRequest {
            kind: crate::MaterialKind::Quiz,
            id: 5,
            is_locked: true,
        };
        assert_eq!(req.path(), "/api/quizzes/5/toggle-lock/");
        assert!(ToggleLockRequest::METHOD.is_mutating());
        assert!(!CurrentUserRequest::METHOD.is_mutating());
    }

    #[test]
    fn test_price_input_is_flattened() {
        let req = UpdatePriceRequest {
            price_id: 3,
            input: PriceInput {
                student_type: StudentType::SchoolStudent,
                subject: 2,
                grade: Some(7),
                price: "25.00".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "student_type": "school_student",
                "subject": 2,
                "grade": 7,
                "price": "25.00"
            })
        );
    }
}
