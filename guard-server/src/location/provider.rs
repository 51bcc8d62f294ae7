//! Location provider trait and fetch timeout

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::LocationSample;

/// Hard ceiling on a device position fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed device/positioning failures, surfaced verbatim to the caller.
/// Every variant means the access decision defaults to denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied by the device")]
    PermissionDenied,

    #[error("Device position unavailable")]
    Unavailable,

    #[error("Timed out waiting for a device position")]
    Timeout,
}

/// Source of device position fixes
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<LocationSample, LocationError>;
}

/// Fetch a fix with a hard timeout; never hangs past the deadline
pub async fn fetch_location(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<LocationSample, LocationError> {
    match tokio::time::timeout(timeout, provider.current_location()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}
