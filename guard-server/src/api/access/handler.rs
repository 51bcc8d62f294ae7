//! Access API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::access::AccessOutcome;
use crate::auth::CurrentActor;
use crate::core::GuardState;
use crate::db::models::{ApprovalRequest, LocationSample};
use crate::utils::{AppError, AppResult, now_millis};

/// Device position as captured by the caller's geolocation API
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckAccessRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0.0))]
    pub accuracy_meters: f64,
    /// Unix millis; defaults to server receipt time
    pub captured_at: Option<i64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
}

/// POST /api/access/check - run the geofence gate for the current actor
pub async fn check(
    State(state): State<GuardState>,
    actor: CurrentActor,
    Json(payload): Json<CheckAccessRequest>,
) -> AppResult<Json<AccessOutcome>> {
    payload.validate()?;

    let sample = LocationSample {
        latitude: payload.latitude,
        longitude: payload.longitude,
        accuracy_meters: payload.accuracy_meters,
        captured_at: payload.captured_at.unwrap_or_else(now_millis),
        speed: payload.speed,
        heading: payload.heading,
    };

    let outcome = state.access_guard().check_access(&actor, &sample).await?;
    Ok(Json(outcome))
}

/// Poll response: the raw request plus its lazily computed standing
#[derive(Debug, Serialize)]
pub struct ApprovalPollResponse {
    pub request: ApprovalRequest,
    /// Unprocessed past its TTL; treat as denied
    pub request_expired: bool,
    /// Approved and still inside the access window
    pub grants_access: bool,
}

/// GET /api/access/approvals/{id} - poll one approval request.
/// Visible to the requesting actor and to admins.
pub async fn poll_approval(
    State(state): State<GuardState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<ApprovalPollResponse>> {
    let request = state
        .approvals()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Approval request {id} not found")))?;

    if request.actor_id != actor.id && !actor.role.is_admin() {
        return Err(AppError::forbidden("Not your approval request"));
    }

    let now = now_millis();
    let ttl = state.config.approval_policy().request_ttl_ms;
    Ok(Json(ApprovalPollResponse {
        request_expired: request.is_request_expired_at(now, ttl),
        grants_access: request.grants_access_at(now),
        request,
    }))
}
