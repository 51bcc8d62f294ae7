//! Alert API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::GuardState;

pub fn router() -> Router<GuardState> {
    Router::new().nest("/api/alerts", routes())
}

fn routes() -> Router<GuardState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/read", post(handler::mark_read))
        .layer(middleware::from_fn(require_admin))
}
