//! Notification Dispatcher Interface
//!
//! Delivery mechanics (push, email, whatever the dashboard wires up) are out
//! of scope; the access pipeline only reports what happened. Dispatch
//! failures are logged and never affect an access decision.

use async_trait::async_trait;

use crate::db::models::{Alert, ApprovalRequest};

/// Sink for alert and approval-resolution notifications
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// A new violation alert was raised
    async fn alert_raised(&self, alert: &Alert);

    /// A pending request was approved or denied
    async fn approval_resolved(&self, request: &ApprovalRequest);
}

/// Default dispatcher: structured log lines only
#[derive(Debug, Default)]
pub struct TracingDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn alert_raised(&self, alert: &Alert) {
        tracing::warn!(
            actor = %alert.actor_id,
            distance_m = alert.distance_meters,
            severity = ?alert.severity,
            "Location violation alert raised"
        );
    }

    async fn approval_resolved(&self, request: &ApprovalRequest) {
        tracing::info!(
            actor = %request.actor_id,
            status = ?request.status,
            "Approval request resolved"
        );
    }
}
