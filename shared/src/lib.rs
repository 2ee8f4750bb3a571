//! Manhaj 共享类型
//!
//! 前端与客户端核心共用的领域模型与 API 协议定义：
//! - `model`: 课程结构、用户、定价与支付等线上数据模型
//! - `material`: 视频 / 测验统一序列（`MaterialItem`）及合并规则
//! - `protocol`: `ApiRequest` 协议与全部端点定义

pub mod material;
pub mod model;
pub mod protocol;

pub use material::{MaterialItem, MaterialKey, MaterialKind, merge_materials};
pub use model::*;
pub use protocol::{Ack, ApiRequest, HttpMethod};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_CSRF_TOKEN: &str = "X-CSRFToken";
pub const STORAGE_LANGUAGE_KEY: &str = "manhaj_language";
pub const STORAGE_PROGRESS_PREFIX: &str = "manhaj_progress_";

/// 课程 ID
pub type CourseId = u64;
