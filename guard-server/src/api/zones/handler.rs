//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::core::GuardState;
use crate::db::models::{Zone, ZoneCreate, ZoneUpdate};
use crate::utils::{AppError, AppResult};

/// GET /api/zones - all configured zones
pub async fn list(State(state): State<GuardState>) -> AppResult<Json<Vec<Zone>>> {
    let zones = state.zones().find_all().await?;
    Ok(Json(zones))
}

/// GET /api/zones/:id
pub async fn get_by_id(
    State(state): State<GuardState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Zone>> {
    let zone = state
        .zones()
        .find_by_number(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Zone {id} not found")))?;
    Ok(Json(zone))
}

/// POST /api/zones - create a zone (next zone number, active by default)
pub async fn create(
    State(state): State<GuardState>,
    Json(payload): Json<ZoneCreate>,
) -> AppResult<Json<Zone>> {
    payload.validate()?;
    let zone = state.zones().create(payload).await?;
    tracing::info!(zone = ?zone.number(), name = %zone.name, "Zone created");
    Ok(Json(zone))
}

/// PUT /api/zones/:id - patch zone fields
pub async fn update(
    State(state): State<GuardState>,
    Path(id): Path<i64>,
    Json(payload): Json<ZoneUpdate>,
) -> AppResult<Json<Zone>> {
    payload.validate()?;
    let zone = state.zones().update(id, payload).await?;
    Ok(Json(zone))
}

/// POST /api/zones/:id/toggle - flip activation (self-heals on last active zone)
pub async fn toggle(
    State(state): State<GuardState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Zone>> {
    let zone = state.zones().toggle(id).await?;
    Ok(Json(zone))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    deleted: bool,
}

/// DELETE /api/zones/:id - rejected for the sole remaining zone
pub async fn delete(
    State(state): State<GuardState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = state.zones().delete(id).await?;
    tracing::info!(zone = id, "Zone deleted");
    Ok(Json(DeleteResponse { deleted }))
}
