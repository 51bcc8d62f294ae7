//! Database Models

// Serde helpers
pub mod record_id;

// Geofence configuration
pub mod zone;

// Access-check records
pub mod alert;
pub mod approval;
pub mod attempt;
pub mod sample;

// Re-exports
pub use alert::{Alert, AlertSeverity, AlertStatus, AlertType};
pub use approval::{
    ApprovalAction, ApprovalRequest, ApprovalStatus, ProcessApproval,
};
pub use attempt::{AttemptRecord, AttemptStatus};
pub use sample::{LocationSample, Verdict};
pub use zone::{Zone, ZoneCreate, ZoneUpdate};
