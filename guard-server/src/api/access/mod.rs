//! Access API 模块
//!
//! 通行检查（所有已认证角色）+ 审批状态轮询（请求本人或管理员）。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::GuardState;

pub fn router() -> Router<GuardState> {
    Router::new().nest("/api/access", routes())
}

fn routes() -> Router<GuardState> {
    Router::new()
        .route("/check", post(handler::check))
        .route("/approvals/{id}", get(handler::poll_approval))
}
