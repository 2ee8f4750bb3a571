//! 乐观更新与对账
//!
//! 本地先改，再请求服务器，最后以服务器数据为准：
//! - 排序：无论请求成败都重新拉取整棵结构树
//! - 锁定开关：只涉及一个布尔值，失败时回滚到旧值，不重新拉取

use manhaj_shared::{Chapter, CourseId, MaterialKey};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::reorder::ReorderPlan;
use crate::request::HttpClient;
use crate::structure::{material_locked, set_material_locked};

/// 一次排序往返结束后应显示的结构树
///
/// `error` 非空时需要提示用户；结构树始终可以直接替换本地状态。
#[derive(Debug)]
pub struct Reconciled {
    pub chapters: Vec<Chapter>,
    pub error: Option<ClientError>,
}

/// 提交排序计划并对账
///
/// 调用前 `optimistic` 应已显示在界面上。返回值按下表选择：
///
/// | 排序请求 | 重新拉取 | 结果 |
/// |---|---|---|
/// | 成功 | 成功 | 服务器结构树 |
/// | 失败 | 成功 | 服务器结构树 + 排序错误 |
/// | 成功 | 失败 | 乐观结构树 + 拉取错误 |
/// | 失败 | 失败 | 拖拽前快照 + 排序错误 |
pub async fn commit_reorder<C: HttpClient>(
    api: &ApiClient<C>,
    course_id: CourseId,
    plan: &ReorderPlan,
    before: Vec<Chapter>,
    optimistic: Vec<Chapter>,
) -> Reconciled {
    let outcome = api.reorder(plan).await;
    let fetched = api.fetch_structure(course_id).await;

    let reconciled = match (outcome, fetched) {
        (Ok(()), Ok(chapters)) => Reconciled {
            chapters,
            error: None,
        },
        (Err(e), Ok(chapters)) => Reconciled {
            chapters,
            error: Some(e),
        },
        (Ok(()), Err(e)) => Reconciled {
            chapters: optimistic,
            error: Some(e),
        },
        (Err(e), Err(_)) => Reconciled {
            chapters: before,
            error: Some(e),
        },
    };

    match &reconciled.error {
        None => log_info!(
            "[Reorder] {:?}: committed {} items",
            plan.scope,
            plan.entries.len()
        ),
        Some(e) => log_warn!("[Reorder] {:?}: reconciled after failure: {}", plan.scope, e),
    }
    reconciled
}

/// 增删改之后重新拉取结构树，保证统计数据正确
pub async fn refresh_after_mutation<C: HttpClient>(
    api: &ApiClient<C>,
    course_id: CourseId,
) -> ClientResult<Vec<Chapter>> {
    api.fetch_structure(course_id)
        .await
        .map_err(|e| e.in_op("optimistic.refresh"))
}

// =========================================================
// 锁定开关
// =========================================================

/// 一次进行中的锁定切换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockToggle {
    pub key: MaterialKey,
    pub previous: bool,
    pub requested: bool,
}

impl LockToggle {
    /// 在本地翻转锁定状态；材料不存在时返回 `None`
    pub fn begin(chapters: &mut [Chapter], key: MaterialKey) -> Option<Self> {
        let previous = material_locked(chapters, key)?;
        set_material_locked(chapters, key, !previous);
        Some(Self {
            key,
            previous,
            requested: !previous,
        })
    }

    pub async fn commit<C: HttpClient>(&self, api: &ApiClient<C>) -> ClientResult<bool> {
        api.set_locked(self.key, self.requested).await
    }

    /// 应用服务器返回的结果：成功时采用服务器确认的值，失败时回滚
    pub fn finish(&self, chapters: &mut [Chapter], result: &ClientResult<bool>) {
        match result {
            Ok(locked) => {
                set_material_locked(chapters, self.key, *locked);
            }
            Err(e) => {
                log_warn!(
                    "[Lock] {}:{} reverted to {}: {}",
                    self.key.kind.as_str(),
                    self.key.id,
                    self.previous,
                    e
                );
                self.revert(chapters);
            }
        }
    }

    pub fn revert(&self, chapters: &mut [Chapter]) {
        set_material_locked(chapters, self.key, self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::{DragBoard, DragPayload, ItemRef, ReorderScope};
    use crate::request::MockHttpClient;
    use crate::structure::fixtures::*;
    use crate::ClientErrorKind;
    use manhaj_shared::HttpMethod;
    use serde_json::json;

    const STRUCTURE: &str = "http://api.test/api/courses/7/structure/";
    const REORDER: &str = "http://api.test/api/sections/11/materials/reorder/";

    fn api() -> ApiClient<MockHttpClient> {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/auth/csrf/",
            200,
            json!({ "csrfToken": "tok" }),
        );
        ApiClient::new(client, "http://api.test")
    }

    /// 把视频 2 拖到视频 1 上，返回 (计划, 拖拽前, 乐观结果)
    fn drag_video_two_first() -> (ReorderPlan, Vec<Chapter>, Vec<Chapter>) {
        let before = sample_tree();
        let scope = ReorderScope::Materials { section_id: 11 };
        let mut board = DragBoard::new();
        board.begin(DragPayload {
            item: ItemRef::video(2),
            scope,
        });
        let plan = board.drop_on(ItemRef::video(1), scope, &before).unwrap();
        let mut optimistic = before.clone();
        plan.apply(&mut optimistic);
        (plan, before, optimistic)
    }

    fn server_tree() -> Vec<Chapter> {
        vec![chapter(1, 0, vec![section(11, 0, vec![video(2, 0), video(1, 1)], vec![quiz(10, 2)])])]
    }

    #[tokio::test]
    async fn test_success_replaces_with_server_tree() {
        let api = api();
        let (plan, before, optimistic) = drag_video_two_first();
        api.transport().mock_empty(HttpMethod::Post, REORDER, 200);
        api.transport()
            .mock_response(HttpMethod::Get, STRUCTURE, 200, json!(server_tree()));

        let result = commit_reorder(&api, 7, &plan, before, optimistic).await;
        assert!(result.error.is_none());
        assert_eq!(result.chapters, server_tree());

        // 先排序，后拉取
        assert_eq!(
            api.transport().calls(),
            vec![
                "GET http://api.test/api/auth/csrf/".to_string(),
                format!("POST {}", REORDER),
                format!("GET {}", STRUCTURE),
            ]
        );
    }

    #[tokio::test]
    async fn test_reorder_with_json_body_is_success() {
        let api = api();
        let (plan, before, optimistic) = drag_video_two_first();
        api.transport()
            .mock_response(HttpMethod::Post, REORDER, 200, json!({ "status": "reordered" }));
        api.transport()
            .mock_response(HttpMethod::Get, STRUCTURE, 200, json!(server_tree()));

        let result = commit_reorder(&api, 7, &plan, before, optimistic).await;
        assert!(result.error.is_none());
        assert_eq!(result.chapters, server_tree());
    }

    #[tokio::test]
    async fn test_failure_shows_fetched_order_not_optimistic() {
        let api = api();
        let (plan, before, optimistic) = drag_video_two_first();
        api.transport()
            .mock_response(HttpMethod::Post, REORDER, 400, json!({ "detail": "bad order" }));
        api.transport()
            .mock_response(HttpMethod::Get, STRUCTURE, 200, json!(sample_tree()));

        let result = commit_reorder(&api, 7, &plan, before, optimistic.clone()).await;
        assert_eq!(result.chapters, sample_tree());
        assert_ne!(result.chapters, optimistic);
        let err = result.error.unwrap();
        assert_eq!(err.message(), "bad order");
        assert_eq!(err.ops(), ["api.reorder".to_string()]);
    }

    #[tokio::test]
    async fn test_refetch_failure_keeps_optimistic_tree() {
        let api = api();
        let (plan, before, optimistic) = drag_video_two_first();
        api.transport().mock_empty(HttpMethod::Post, REORDER, 204);
        api.transport().mock_network_error(HttpMethod::Get, STRUCTURE);

        let result = commit_reorder(&api, 7, &plan, before, optimistic.clone()).await;
        assert_eq!(result.chapters, optimistic);
        assert_eq!(result.error.unwrap().kind, ClientErrorKind::Network);
    }

    #[tokio::test]
    async fn test_double_failure_restores_snapshot() {
        let api = api();
        let (plan, before, optimistic) = drag_video_two_first();
        api.transport().mock_network_error(HttpMethod::Post, REORDER);
        api.transport().mock_network_error(HttpMethod::Get, STRUCTURE);

        let result = commit_reorder(&api, 7, &plan, before.clone(), optimistic).await;
        assert_eq!(result.chapters, before);
        assert_eq!(result.error.unwrap().ops(), ["api.reorder".to_string()]);
    }

    #[tokio::test]
    async fn test_lock_toggle_reverts_on_rejection() {
        let api = api();
        api.transport().mock_response(
            HttpMethod::Post,
            "http://api.test/api/videos/1/toggle-lock/",
            500,
            json!({ "detail": "nope" }),
        );

        let mut tree = sample_tree();
        let toggle = LockToggle::begin(&mut tree, MaterialKey::video(1)).unwrap();
        assert_eq!(material_locked(&tree, MaterialKey::video(1)), Some(true));

        let result = toggle.commit(&api).await;
        toggle.finish(&mut tree, &result);
        assert!(result.is_err());
        assert_eq!(material_locked(&tree, MaterialKey::video(1)), Some(false));
        // 没有重新拉取结构树
        assert!(!api.transport().calls().iter().any(|c| c.contains("structure")));
    }

    #[tokio::test]
    async fn test_lock_toggle_applies_server_value() {
        let api = api();
        api.transport().mock_response(
            HttpMethod::Post,
            "http://api.test/api/quizzes/10/toggle-lock/",
            200,
            json!({ "is_locked": true }),
        );

        let mut tree = sample_tree();
        let toggle = LockToggle::begin(&mut tree, MaterialKey::quiz(10)).unwrap();
        let result = toggle.commit(&api).await;
        toggle.finish(&mut tree, &result);
        assert_eq!(material_locked(&tree, MaterialKey::quiz(10)), Some(true));

        let requests = api.transport().requests.borrow();
        assert_eq!(
            requests[1].3,
            Some(crate::request::RequestBody::Json(r#"{"is_locked":true}"#.into()))
        );

        assert!(LockToggle::begin(&mut tree, MaterialKey::quiz(99)).is_none());
    }

    #[tokio::test]
    async fn test_refresh_after_mutation_normalizes() {
        let api = api();
        api.transport().mock_response(
            HttpMethod::Get,
            STRUCTURE,
            200,
            json!([
                { "id": 2, "title": "B", "order": 1 },
                { "id": 1, "title": "A", "order": 0 }
            ]),
        );
        let tree = refresh_after_mutation(&api, 7).await.unwrap();
        assert_eq!(tree.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
