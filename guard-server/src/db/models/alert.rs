//! Admin Alert Model
//!
//! One alert row per invalid access attempt, for administrative review.
//! Read/unread toggling is the only mutation after creation.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Distance beyond which a violation is escalated to critical
const CRITICAL_DISTANCE_METERS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LocationViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Severity scales with how far outside the fence the attempt was
    pub fn for_distance(distance_meters: i64) -> Self {
        if distance_meters > CRITICAL_DISTANCE_METERS {
            Self::Critical
        } else {
            Self::Warning
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Unread,
    Read,
}

/// Violation alert for administrative review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(with = "super::record_id::option")]
    pub id: Option<RecordId>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub actor_id: String,
    pub actor_name: String,
    pub distance_meters: i64,
    pub attempt_record_id: String,
    pub created_at: i64,
    pub status: AlertStatus,
    pub requires_action: bool,
}

impl Alert {
    /// Record id in the "admin_alert:key" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_escalates_past_five_km() {
        assert_eq!(AlertSeverity::for_distance(0), AlertSeverity::Warning);
        assert_eq!(AlertSeverity::for_distance(5_000), AlertSeverity::Warning);
        assert_eq!(AlertSeverity::for_distance(5_001), AlertSeverity::Critical);
    }
}
