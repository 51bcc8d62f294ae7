//! Statistics API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::GuardState;

pub fn router() -> Router<GuardState> {
    Router::new()
        .route("/api/statistics", get(handler::get_stats))
        .layer(middleware::from_fn(require_admin))
}
