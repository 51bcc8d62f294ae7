//! Approval API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentActor;
use crate::core::GuardState;
use crate::db::models::{ApprovalRequest, ProcessApproval};
use crate::utils::AppResult;

/// GET /api/approvals/pending - unexpired pending requests, oldest first
pub async fn list_pending(
    State(state): State<GuardState>,
) -> AppResult<Json<Vec<ApprovalRequest>>> {
    let pending = state.approvals().list_pending().await?;
    Ok(Json(pending))
}

/// POST /api/approvals/:id/decide - approve or deny a pending request.
///
/// Exactly-once: a second decision on the same request gets a 409 and the
/// first decision stands.
pub async fn decide(
    State(state): State<GuardState>,
    admin: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<ProcessApproval>,
) -> AppResult<Json<ApprovalRequest>> {
    let request = state
        .approvals()
        .process(&id, payload.action, &admin, payload.reason)
        .await?;

    tracing::info!(
        request = %request.id_string(),
        actor = %request.actor_id,
        status = ?request.status,
        admin = %admin.id,
        "Approval request decided"
    );

    state.dispatcher.approval_resolved(&request).await;
    Ok(Json(request))
}
