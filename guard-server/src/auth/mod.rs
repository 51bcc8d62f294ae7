//! 身份模块
//!
//! 凭证校验在上游（仪表盘的登录层）完成，本服务只消费转发的身份：
//! - [`CurrentActor`] - 当前请求的操作者
//! - [`extractor`] - 从转发头提取身份的 axum extractor
//! - [`require_admin`] - 管理接口的角色检查中间件

pub mod actor;
pub mod extractor;
pub mod middleware;

pub use actor::{ActorRole, CurrentActor};
pub use middleware::require_admin;
