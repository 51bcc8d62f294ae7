//! Attempt Record Model
//!
//! Append-only audit row for one access check. `status` mirrors the
//! verdict at write time and never changes afterward; a denied attempt is
//! resolved through a separate ApprovalRequest, not by mutating this row.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::{LocationSample, Verdict};

/// Audit status, fixed at write time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Approved,
    Denied,
}

impl AttemptStatus {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        if verdict.is_valid {
            Self::Approved
        } else {
            Self::Denied
        }
    }
}

/// Immutable audit entry for one access check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    #[serde(with = "super::record_id::option")]
    pub id: Option<RecordId>,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: String,
    pub sample: LocationSample,
    pub verdict: Verdict,
    pub captured_at: i64,
    pub status: AttemptStatus,
}

impl AttemptRecord {
    /// Record id in the "location_log:key" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
