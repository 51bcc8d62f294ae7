//! Location Sample and Verdict
//!
//! 定位采样由设备定位 API 产生，仅嵌入在 AttemptRecord 里持久化，
//! 不单独成表。

use serde::{Deserialize, Serialize};

/// One device position fix, as reported by the geolocation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius in meters
    pub accuracy_meters: f64,
    /// Unix millis when the fix was captured
    pub captured_at: i64,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
}

/// Outcome of evaluating one sample against the active zones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub is_valid: bool,
    /// Distance to the nearest zone center (i64::MAX when no zone was considered)
    pub distance_meters: i64,
    pub nearest_zone_id: Option<i64>,
    /// Configured radius of the nearest zone (0 when no zone was considered)
    pub allowed_radius: i64,
    /// Advisory only: sample accuracy within MIN_ACCURACY_METERS.
    /// An inaccurate-but-inside sample still validates; the approver sees the flag.
    pub is_accurate: bool,
    pub considered_zone_count: u32,
}
