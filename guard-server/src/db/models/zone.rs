//! Zone Model
//!
//! 地理围栏区域（工厂园区）：圆心坐标 + 半径。
//! 记录 key 为递增整数，全局至少保持一个 active 区域。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Geofenced zone entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    #[serde(with = "super::record_id::option")]
    pub id: Option<RecordId>,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: i64,
    pub active: bool,
}

impl Zone {
    /// Numeric zone number extracted from the record key ("zone:7" -> 7)
    pub fn number(&self) -> Option<i64> {
        let id = self.id.as_ref()?;
        let raw = id.to_string();
        let (_, key) = raw.split_once(':')?;
        key.trim_matches(|c| c == '⟨' || c == '⟩').parse().ok()
    }
}

/// Create zone payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZoneCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 300))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Allowed radius in meters
    #[validate(range(min = 1, max = 100_000))]
    pub radius_meters: i64,
    /// Defaults to true when omitted
    pub active: Option<bool>,
}

/// Update zone payload (merge semantics; activation changes go through toggle)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100_000))]
    pub radius_meters: Option<i64>,
}
