//! Role middleware
//!
//! Admin-only surfaces (zone management, approval decisions, alerts, stats)
//! sit behind an explicit role claim check.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::auth::CurrentActor;
use crate::utils::AppError;

/// Require the forwarded identity to carry the admin role
pub async fn require_admin(mut req: Request, next: Next) -> Result<Response, AppError> {
    let actor = match req.extensions().get::<CurrentActor>() {
        Some(actor) => actor.clone(),
        None => CurrentActor::from_headers(req.headers())?,
    };

    if !actor.role.is_admin() {
        tracing::warn!(actor = %actor.id, role = %actor.role, uri = %req.uri(), "Admin route refused");
        return Err(AppError::forbidden("Administrator role required"));
    }

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
