//! Actor Extractor
//!
//! Materializes [`CurrentActor`] from the identity headers the upstream auth
//! layer forwards with every request. Missing or malformed identity is a 401.

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};

use crate::auth::{ActorRole, CurrentActor};
use crate::utils::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

impl CurrentActor {
    /// Parse the forwarded identity headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let get = |name: &str| -> Result<&str, AppError> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.trim().is_empty())
                .ok_or(AppError::Unauthorized)
        };

        let id = get(ACTOR_ID_HEADER)?.to_string();
        let name = get(ACTOR_NAME_HEADER)?.to_string();
        let role: ActorRole = get(ACTOR_ROLE_HEADER)?
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Self { id, name, role })
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let actor = CurrentActor::from_headers(&parts.headers)?;

        // Store in extensions for potential reuse
        parts.extensions.insert(actor.clone());

        Ok(actor)
    }
}
