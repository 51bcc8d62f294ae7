//! Health API
//!
//! Public liveness probe; everything else sits behind forwarded identity.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::GuardState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "guard-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<GuardState> {
    Router::new().route("/api/health", get(health))
}
