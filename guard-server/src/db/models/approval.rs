//! Approval Request Model
//!
//! 远程访问审批请求的状态机：
//!
//! ```text
//!  PENDING ──approve──▶ APPROVED ──(now > access_expires_at)──▶ 过期（等同拒绝）
//!     │
//!     └──deny──▶ DENIED
//!     │
//!     └──(now > requested_at + REQUEST_TTL, 未处理)──▶ 过期（等同拒绝）
//! ```
//!
//! pending → approved/denied 只发生一次；终态不可覆盖。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::{LocationSample, Verdict};

/// Lifecycle state of an approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

/// Admin decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Deny,
}

/// One remote-access approval request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    #[serde(with = "super::record_id::option")]
    pub id: Option<RecordId>,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: String,
    pub requested_at: i64,
    pub sample: LocationSample,
    pub verdict: Verdict,
    /// Audit row this request was opened for
    pub attempt_record_id: String,
    pub status: ApprovalStatus,
    pub processed_at: Option<i64>,
    pub processed_by: Option<String>,
    pub processed_by_name: Option<String>,
    pub admin_reason: Option<String>,
    /// Set on approval: processed_at + grant window
    pub access_expires_at: Option<i64>,
}

impl ApprovalRequest {
    /// Record id in the "location_approval:key" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// An unprocessed request past its TTL counts as denied even though the
    /// row still says pending (lazy expiry).
    pub fn is_request_expired_at(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.status == ApprovalStatus::Pending && now_ms > self.requested_at + ttl_ms
    }

    /// Whether an approved grant is still inside its access window
    pub fn grants_access_at(&self, now_ms: i64) -> bool {
        self.status == ApprovalStatus::Approved
            && self.access_expires_at.is_some_and(|exp| now_ms <= exp)
    }
}

/// Admin decision payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessApproval {
    pub action: ApprovalAction,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{LocationSample, Verdict};

    fn request(status: ApprovalStatus, requested_at: i64, expires: Option<i64>) -> ApprovalRequest {
        ApprovalRequest {
            id: None,
            actor_id: "emp:1".into(),
            actor_name: "tester".into(),
            actor_role: "operator".into(),
            requested_at,
            sample: LocationSample {
                latitude: 0.0,
                longitude: 0.0,
                accuracy_meters: 10.0,
                captured_at: requested_at,
                speed: None,
                heading: None,
            },
            verdict: Verdict {
                is_valid: false,
                distance_meters: 2000,
                nearest_zone_id: Some(1),
                allowed_radius: 500,
                is_accurate: true,
                considered_zone_count: 1,
            },
            attempt_record_id: "location_log:x".into(),
            status,
            processed_at: None,
            processed_by: None,
            processed_by_name: None,
            admin_reason: None,
            access_expires_at: expires,
        }
    }

    #[test]
    fn pending_request_expires_after_ttl() {
        let req = request(ApprovalStatus::Pending, 1_000, None);
        assert!(!req.is_request_expired_at(1_000 + 500, 86_400_000));
        assert!(req.is_request_expired_at(1_000 + 86_400_001, 86_400_000));
    }

    #[test]
    fn processed_request_never_reports_request_expiry() {
        let req = request(ApprovalStatus::Denied, 1_000, None);
        assert!(!req.is_request_expired_at(i64::MAX, 86_400_000));
    }

    #[test]
    fn approved_grant_honors_access_window() {
        let req = request(ApprovalStatus::Approved, 1_000, Some(10_000));
        assert!(req.grants_access_at(10_000));
        assert!(!req.grants_access_at(10_001));
    }

    #[test]
    fn approval_without_expiry_grants_nothing() {
        let req = request(ApprovalStatus::Approved, 1_000, None);
        assert!(!req.grants_access_at(2_000));
    }
}
