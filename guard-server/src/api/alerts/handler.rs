//! Alert API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::GuardState;
use crate::db::models::{Alert, AlertStatus};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
}

/// GET /api/alerts?status=unread - violation alerts, newest first
pub async fn list(
    State(state): State<GuardState>,
    Query(filter): Query<AlertFilter>,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = state.alerts().find_all(filter.status).await?;
    Ok(Json(alerts))
}

/// POST /api/alerts/:id/read - the single permitted mutation
pub async fn mark_read(
    State(state): State<GuardState>,
    Path(id): Path<String>,
) -> AppResult<Json<Alert>> {
    let alert = state.alerts().mark_read(&id).await?;
    Ok(Json(alert))
}
