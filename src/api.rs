//! 类型化 API 客户端
//!
//! 所有请求都经过 `ApiClient::send`：拼接基础地址、为变更请求附加 CSRF 头、
//! 把非 2xx 响应转换为 `ClientError`。CSRF 令牌首次需要时获取并缓存，
//! 克隆出的客户端共享同一份缓存；并发的首次请求只会触发一次获取。

use std::sync::{Arc, Mutex, PoisonError};

use futures::lock::Mutex as AsyncMutex;
use manhaj_shared::protocol::*;
use manhaj_shared::*;
use serde::de::DeserializeOwned;

use crate::error::ClientResult;
use crate::forms::{QuestionPayload, VideoPayload};
use crate::reorder::{ReorderCall, ReorderPlan};
use crate::request::{FileUpload, FormPart, HttpClient, HttpRequest, HttpResponse};
use crate::structure;
use crate::ClientError;

pub struct ApiClient<C> {
    client: Arc<C>,
    base_url: String,
    csrf: Arc<Mutex<Option<String>>>,
    // 获取令牌期间持有，后来者等待后直接读缓存
    csrf_fetch: Arc<AsyncMutex<()>>,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            base_url: self.base_url.clone(),
            csrf: Arc::clone(&self.csrf),
            csrf_fetch: Arc::clone(&self.csrf_fetch),
        }
    }
}

/// 定价页需要的全部数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingCatalog {
    pub prices: Vec<LessonPrice>,
    pub subjects: Vec<Subject>,
    pub grades: Vec<Grade>,
}

/// 支付页需要的全部数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentsOverview {
    pub info: Option<TeacherPaymentInfo>,
    pub earnings: EarningsSummary,
    pub payouts: Vec<Payout>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf: Arc::new(Mutex::new(None)),
            csrf_fetch: Arc::new(AsyncMutex::new(())),
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_csrf<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> R {
        let mut guard = self.csrf.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    // =========================================================
    // CSRF
    // =========================================================

    /// 返回缓存的令牌，没有时向服务器获取一次
    ///
    /// 获取过程中到达的调用等待同一次获取的结果，不会重复请求。
    pub async fn csrf_token(&self) -> ClientResult<String> {
        if let Some(token) = self.with_csrf(|cached| cached.clone()) {
            return Ok(token);
        }

        let _fetching = self.csrf_fetch.lock().await;
        if let Some(token) = self.with_csrf(|cached| cached.clone()) {
            return Ok(token);
        }

        let req = HttpRequest::new(&self.url(&CsrfRequest.path()), CsrfRequest::METHOD);
        let token: CsrfToken = self
            .execute(req)
            .await
            .and_then(|resp| resp.json())
            .map_err(|e| e.in_op("api.csrf"))?;

        log_info!("[Api] CSRF token refreshed");
        self.with_csrf(|cached| *cached = Some(token.csrf_token.clone()));
        Ok(token.csrf_token)
    }

    pub fn invalidate_csrf(&self) {
        self.with_csrf(|cached| *cached = None);
    }

    // =========================================================
    // 发送
    // =========================================================

    async fn execute(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();

        let resp = match self.client.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                log_error!("[Api] {} {} failed: {}", method.as_str(), url, e);
                return Err(e);
            }
        };
        if resp.is_success() {
            return Ok(resp);
        }

        let err = ClientError::from_response(resp.status, &resp.body);
        if err.is_csrf_failure() {
            self.invalidate_csrf();
        }
        log_error!(
            "[Api] {} {} returned {}: {}",
            method.as_str(),
            url,
            resp.status,
            err.message()
        );
        Err(err)
    }

    async fn authorize(&self, mut req: HttpRequest) -> ClientResult<HttpRequest> {
        if req.method.is_mutating() {
            let token = self.csrf_token().await?;
            req = req.with_header(HEADER_CSRF_TOKEN, &token);
        }
        Ok(req)
    }

    /// 发送 JSON 请求并解析为端点声明的响应类型
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let mut req = HttpRequest::new(&self.url(&request.path()), R::METHOD);
        if R::METHOD.is_mutating() {
            let body = serde_json::to_value(request)?;
            let is_empty = body.is_null() || body.as_object().is_some_and(|o| o.is_empty());
            if !is_empty {
                req = req
                    .with_header("Content-Type", "application/json")
                    .with_body(body);
            }
        }
        let req = self.authorize(req).await?;
        self.execute(req).await?.json()
    }

    /// 发送 multipart 请求（文件上传）
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        parts: Vec<FormPart>,
    ) -> ClientResult<T> {
        let req = HttpRequest::new(&self.url(path), method).with_multipart(parts);
        let req = self.authorize(req).await?;
        self.execute(req).await?.json()
    }

    // =========================================================
    // 会话
    // =========================================================

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let user = self
            .send(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        // 登录后服务器会轮换 CSRF 令牌
        self.invalidate_csrf();
        Ok(user)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.send(&LogoutRequest).await;
        self.invalidate_csrf();
        result.map(drop)
    }

    pub async fn current_user(&self) -> ClientResult<User> {
        self.send(&CurrentUserRequest).await
    }

    pub async fn platform_settings(&self) -> ClientResult<PlatformSettings> {
        self.send(&PlatformSettingsRequest).await
    }

    pub async fn upload_profile_picture(&self, user_id: u64, file: FileUpload) -> ClientResult<User> {
        self.send_multipart(
            HttpMethod::Patch,
            &user_path(user_id),
            vec![FormPart::file("profile_picture", file)],
        )
        .await
    }

    // =========================================================
    // 课程结构
    // =========================================================

    pub async fn fetch_structure(&self, course_id: CourseId) -> ClientResult<Vec<Chapter>> {
        let chapters = self
            .send(&CourseStructureRequest { course_id })
            .await
            .map_err(|e| e.in_op("api.fetch_structure"))?;
        Ok(structure::normalize(chapters))
    }

    pub async fn reorder(&self, plan: &ReorderPlan) -> ClientResult<()> {
        let result = match plan.to_call() {
            ReorderCall::List(req) => self.send(&req).await,
            ReorderCall::Materials(req) => self.send(&req).await,
        };
        result.map(drop).map_err(|e| e.in_op("api.reorder"))
    }

    /// 返回服务器确认后的锁定状态
    pub async fn set_locked(&self, key: MaterialKey, locked: bool) -> ClientResult<bool> {
        let state = self
            .send(&ToggleLockRequest {
                kind: key.kind,
                id: key.id,
                is_locked: locked,
            })
            .await
            .map_err(|e| e.in_op("api.set_locked"))?;
        Ok(state.is_locked)
    }

    pub async fn create_video(&self, section_id: u64, payload: &VideoPayload) -> ClientResult<Video> {
        self.send_multipart(
            HttpMethod::Post,
            &video_collection_path(section_id),
            payload.to_parts(),
        )
        .await
    }

    pub async fn update_video(&self, video_id: u64, payload: &VideoPayload) -> ClientResult<Video> {
        self.send_multipart(HttpMethod::Patch, &video_path(video_id), payload.to_parts())
            .await
    }

    pub async fn create_question(
        &self,
        quiz_id: u64,
        payload: &QuestionPayload,
    ) -> ClientResult<Question> {
        self.send_multipart(
            HttpMethod::Post,
            &question_collection_path(quiz_id),
            payload.to_parts(),
        )
        .await
    }

    pub async fn update_question(
        &self,
        question_id: u64,
        payload: &QuestionPayload,
    ) -> ClientResult<Question> {
        self.send_multipart(
            HttpMethod::Patch,
            &question_path(question_id),
            payload.to_parts(),
        )
        .await
    }

    // =========================================================
    // 定价与支付
    // =========================================================

    pub async fn pricing_catalog(&self) -> ClientResult<PricingCatalog> {
        let (prices, subjects, grades) = futures::try_join!(
            self.send(&ListPricesRequest),
            self.send(&ListSubjectsRequest),
            self.send(&ListGradesRequest),
        )?;
        Ok(PricingCatalog {
            prices,
            subjects,
            grades,
        })
    }

    pub async fn payments_overview(&self) -> ClientResult<PaymentsOverview> {
        let (info, earnings, payouts) = futures::try_join!(
            self.send(&GetPaymentInfoRequest),
            self.send(&EarningsRequest),
            self.send(&ListPayoutsRequest),
        )?;
        Ok(PaymentsOverview {
            info: info.into_iter().next(),
            earnings,
            payouts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientErrorKind;
    use crate::request::{MockHttpClient, RequestBody};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api() -> ApiClient<MockHttpClient> {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/auth/csrf/",
            200,
            json!({ "csrfToken": "tok-1" }),
        );
        ApiClient::new(client, format!("{}/", BASE))
    }

    #[tokio::test]
    async fn test_csrf_fetched_once_and_attached_to_mutations() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/courses/3/chapters/",
            201,
            json!({ "id": 9, "title": "Intro", "order": 0 }),
        );
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/courses/3/structure/",
            200,
            json!([]),
        );

        for _ in 0..2 {
            let chapter = api
                .send(&CreateChapterRequest {
                    course_id: 3,
                    title: "Intro".into(),
                })
                .await
                .unwrap();
            assert_eq!(chapter.id, 9);
        }
        api.fetch_structure(3).await.unwrap();

        assert_eq!(
            api.client.calls(),
            vec![
                "GET http://api.test/api/auth/csrf/",
                "POST http://api.test/api/courses/3/chapters/",
                "POST http://api.test/api/courses/3/chapters/",
                "GET http://api.test/api/courses/3/structure/",
            ]
        );

        let requests = api.client.requests.borrow();
        let (_, _, headers, body) = &requests[1];
        assert_eq!(headers.get(HEADER_CSRF_TOKEN).map(String::as_str), Some("tok-1"));
        assert_eq!(body, &Some(RequestBody::Json(r#"{"title":"Intro"}"#.into())));
        assert!(!requests[3].2.contains_key(HEADER_CSRF_TOKEN));
    }

    #[tokio::test]
    async fn test_csrf_rejection_drops_cached_token() {
        let api = api();
        let url = "http://api.test/api/chapters/4/";
        api.client.mock_response(
            HttpMethod::Delete,
            url,
            403,
            json!({ "detail": "CSRF Failed: CSRF token incorrect." }),
        );
        api.client.mock_empty(HttpMethod::Delete, url, 204);

        let err = api
            .send(&DeleteChapterRequest { chapter_id: 4 })
            .await
            .unwrap_err();
        assert!(err.is_csrf_failure());

        // 不自动重试，由用户再次操作
        api.send(&DeleteChapterRequest { chapter_id: 4 }).await.unwrap();

        let csrf_calls = api
            .client
            .calls()
            .iter()
            .filter(|c| c.ends_with("/api/auth/csrf/"))
            .count();
        assert_eq!(csrf_calls, 2);
        // 仅含路径参数的请求不发送请求体
        assert!(api.client.requests.borrow()[1].3.is_none());
    }

    #[tokio::test]
    async fn test_delete_with_detail_body_is_success() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Delete,
            "http://api.test/api/private-lesson-prices/5/",
            200,
            json!({ "detail": "Price deleted." }),
        );
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/logout/",
            200,
            json!({ "detail": "Successfully logged out." }),
        );

        let ack = api.send(&DeletePriceRequest { price_id: 5 }).await.unwrap();
        assert_eq!(ack, Ack);
        api.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_mutations_share_one_csrf_fetch() {
        let api = api();
        api.client.yield_before_reply();
        api.client.mock_empty(HttpMethod::Delete, "http://api.test/api/chapters/1/", 204);
        api.client.mock_empty(HttpMethod::Delete, "http://api.test/api/chapters/2/", 204);

        let (first, second) = futures::join!(
            api.send(&DeleteChapterRequest { chapter_id: 1 }),
            api.send(&DeleteChapterRequest { chapter_id: 2 }),
        );
        first.unwrap();
        second.unwrap();

        let calls = api.client.calls();
        let csrf_calls = calls.iter().filter(|c| c.ends_with("/api/auth/csrf/")).count();
        assert_eq!(csrf_calls, 1);
        assert_eq!(calls.len(), 3);
        for (_, _, headers, _) in api.client.requests.borrow().iter().skip(1) {
            assert_eq!(headers.get(HEADER_CSRF_TOKEN).map(String::as_str), Some("tok-1"));
        }
    }

    #[tokio::test]
    async fn test_logout_invalidates_even_on_failure() {
        let api = api();
        api.client
            .mock_network_error(HttpMethod::Post, "http://api.test/api/auth/logout/");

        api.csrf_token().await.unwrap();
        let err = api.logout().await.unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Network);
        assert!(api.with_csrf(|cached| cached.is_none()));
    }

    #[tokio::test]
    async fn test_clones_share_csrf_cache() {
        let api = api();
        let other = api.clone();
        api.csrf_token().await.unwrap();
        other.csrf_token().await.unwrap();
        assert_eq!(api.client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_message_surfaces() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/quizzes/2/toggle-lock/",
            400,
            json!({ "error": "Quiz is part of a published exam" }),
        );

        let err = api
            .set_locked(MaterialKey::quiz(2), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Server);
        assert_eq!(err.message(), "Quiz is part of a published exam");
        assert_eq!(err.ops(), ["api.set_locked".to_string()]);
    }

    #[tokio::test]
    async fn test_video_upload_is_multipart() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/sections/5/videos/",
            201,
            json!({ "id": 1, "title": "Intro", "order": 0 }),
        );
        let payload = VideoPayload {
            title: "Intro".into(),
            description: String::new(),
            video_url: None,
            file: Some(FileUpload {
                name: "intro.mp4".into(),
                content_type: "video/mp4".into(),
                bytes: vec![0, 1, 2],
            }),
            duration_minutes: 12,
            is_locked: true,
        };

        let video = api.create_video(5, &payload).await.unwrap();
        assert_eq!(video.id, 1);

        let requests = api.client.requests.borrow();
        let (_, method, headers, body) = &requests[1];
        assert_eq!(method, "POST");
        assert!(headers.contains_key(HEADER_CSRF_TOKEN));
        assert!(!headers.contains_key("Content-Type"));
        match body {
            Some(RequestBody::Multipart(parts)) => {
                assert!(parts.contains(&FormPart::text("duration_minutes", "12")));
                assert!(parts.contains(&FormPart::text("is_locked", "true")));
                assert!(parts.iter().any(|p| matches!(p, FormPart::File { name, .. } if name == "video_file")));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pricing_catalog_loads_all_lists() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/private-lesson-prices/",
            200,
            json!([{ "id": 1, "student_type": "university_student", "subject": 2, "price": "40.00" }]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/subjects/",
            200,
            json!([{ "id": 2, "name_en": "Physics", "name_ar": "فيزياء" }]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/grades/",
            200,
            json!([]),
        );

        let catalog = api.pricing_catalog().await.unwrap();
        assert_eq!(catalog.prices.len(), 1);
        assert_eq!(catalog.subjects[0].name(Language::Ar), "فيزياء");
        assert!(catalog.grades.is_empty());
    }

    #[tokio::test]
    async fn test_payments_overview_fails_when_any_part_fails() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/payments/teacher-payment-info/",
            200,
            json!([]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/payments/payments/my_earnings/",
            500,
            json!({ "detail": "boom" }),
        );
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/payments/payouts/",
            200,
            json!([]),
        );

        let err = api.payments_overview().await.unwrap_err();
        assert_eq!(err.message(), "boom");
    }
}
