//! Approval API 模块
//!
//! 管理员审批队列：待处理列表 + 批准/拒绝。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::GuardState;

pub fn router() -> Router<GuardState> {
    Router::new().nest("/api/approvals", routes())
}

fn routes() -> Router<GuardState> {
    Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/{id}/decide", post(handler::decide))
        .layer(middleware::from_fn(require_admin))
}
