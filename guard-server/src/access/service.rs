//! Access check service

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentActor;
use crate::db::models::{LocationSample, Verdict};
use crate::db::repository::approval::{ApprovalLocks, ApprovalPolicy};
use crate::db::repository::zone::ZoneLocks;
use crate::db::repository::{
    AlertRepository, ApprovalRepository, AttemptLogRepository, ZoneRepository,
};
use crate::geofence;
use crate::location::{fetch_location, LocationProvider};
use crate::notify::NotificationDispatcher;
use crate::utils::{now_millis, AppResult};

/// Final state of one access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Pending,
    Denied,
}

/// What the caller gets back from a check. Always carries the verdict so the
/// UI can explain the decision (distance from the nearest zone, required
/// radius) without guessing.
#[derive(Debug, Clone, Serialize)]
pub struct AccessOutcome {
    pub decision: AccessDecision,
    pub verdict: Verdict,
    pub attempt_record_id: String,
    /// Set when the decision hangs on an approval request
    pub approval_id: Option<String>,
    /// Admin role claim skipped the geofence gate
    pub bypass: bool,
    pub message: String,
}

/// Orchestrates Evaluate → Log → Approve-or-Alert for one actor/sample
#[derive(Clone)]
pub struct AccessGuard {
    db: Surreal<Db>,
    zone_locks: Arc<ZoneLocks>,
    approval_locks: Arc<ApprovalLocks>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    policy: ApprovalPolicy,
}

impl AccessGuard {
    pub fn new(
        db: Surreal<Db>,
        zone_locks: Arc<ZoneLocks>,
        approval_locks: Arc<ApprovalLocks>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        policy: ApprovalPolicy,
    ) -> Self {
        Self {
            db,
            zone_locks,
            approval_locks,
            dispatcher,
            policy,
        }
    }

    fn zones(&self) -> ZoneRepository {
        ZoneRepository::new(self.db.clone(), self.zone_locks.clone())
    }

    fn attempts(&self) -> AttemptLogRepository {
        AttemptLogRepository::new(self.db.clone())
    }

    fn approvals(&self) -> ApprovalRepository {
        ApprovalRepository::new(self.db.clone(), self.policy, self.approval_locks.clone())
    }

    fn alerts(&self) -> AlertRepository {
        AlertRepository::new(self.db.clone())
    }

    /// Run one access check against the wall clock
    pub async fn check_access(
        &self,
        actor: &CurrentActor,
        sample: &LocationSample,
    ) -> AppResult<AccessOutcome> {
        self.check_access_at(actor, sample, now_millis()).await
    }

    /// Fetch the sample from a provider (hard timeout) and run the check.
    /// Any provider error fails closed: no attempt, no grant.
    pub async fn check_access_via(
        &self,
        provider: &dyn LocationProvider,
        actor: &CurrentActor,
        timeout: Duration,
    ) -> AppResult<AccessOutcome> {
        let sample = fetch_location(provider, timeout).await?;
        self.check_access(actor, &sample).await
    }

    /// Clock-explicit form of [`check_access`], used directly by tests.
    ///
    /// Every persistence failure on this path propagates as an error; a
    /// failed write is never interpreted as a grant.
    pub async fn check_access_at(
        &self,
        actor: &CurrentActor,
        sample: &LocationSample,
        now_ms: i64,
    ) -> AppResult<AccessOutcome> {
        let zones = self.zones().find_active().await?;
        let verdict = geofence::evaluate(sample, &zones);

        // The audit row is written before any grant; a logging failure
        // surfaces to the caller instead of silently passing anyone through.
        let attempt = self
            .attempts()
            .record(actor, sample, &verdict, now_ms)
            .await?;
        let attempt_id = attempt.id_string();

        if actor.role.bypasses_geofence() {
            tracing::info!(actor = %actor.id, "Geofence bypass via admin role claim");
            return Ok(AccessOutcome {
                decision: AccessDecision::Granted,
                verdict,
                attempt_record_id: attempt_id,
                approval_id: None,
                bypass: true,
                message: "Access granted (administrator)".to_string(),
            });
        }

        if verdict.is_valid {
            return Ok(AccessOutcome {
                decision: AccessDecision::Granted,
                verdict,
                attempt_record_id: attempt_id,
                approval_id: None,
                bypass: false,
                message: "Location verified inside an authorized zone".to_string(),
            });
        }

        let approvals = self.approvals();

        if let Some(grant) = approvals.has_valid_approval_at(&actor.id, now_ms).await? {
            return Ok(AccessOutcome {
                decision: AccessDecision::Granted,
                verdict,
                attempt_record_id: attempt_id,
                approval_id: Some(grant.id_string()),
                bypass: false,
                message: "Access granted under an active remote approval".to_string(),
            });
        }

        // Every distinct invalid attempt is independently alert-worthy,
        // even when it reuses an existing pending request.
        let alert = self.alerts().raise(&attempt, now_ms).await?;
        self.dispatcher.alert_raised(&alert).await;

        // An explicit denial stands for the rest of its TTL; keep reporting
        // it instead of reopening a request the admin just refused.
        if let Some(denied) = approvals.find_recent_denial_at(&actor.id, now_ms).await? {
            return Ok(AccessOutcome {
                decision: AccessDecision::Denied,
                verdict: verdict.clone(),
                attempt_record_id: attempt_id,
                approval_id: Some(denied.id_string()),
                bypass: false,
                message: denial_message(&verdict),
            });
        }

        let (request, created) = approvals
            .find_or_create_pending_at(actor, sample, &verdict, &attempt_id, now_ms)
            .await?;
        if created {
            tracing::info!(
                actor = %actor.id,
                request = %request.id_string(),
                "Opened approval request for out-of-zone access"
            );
        }

        Ok(AccessOutcome {
            decision: AccessDecision::Pending,
            verdict: verdict.clone(),
            attempt_record_id: attempt_id,
            approval_id: Some(request.id_string()),
            bypass: false,
            message: pending_message(&verdict),
        })
    }
}

fn distance_phrase(verdict: &Verdict) -> String {
    if verdict.nearest_zone_id.is_none() {
        return "no active factory zone is configured".to_string();
    }
    format!(
        "{} m from the nearest factory zone (allowed radius {} m)",
        verdict.distance_meters, verdict.allowed_radius
    )
}

fn pending_message(verdict: &Verdict) -> String {
    format!(
        "Outside authorized zones: {}. Awaiting administrator approval.",
        distance_phrase(verdict)
    )
}

fn denial_message(verdict: &Verdict) -> String {
    format!(
        "Access denied by an administrator. Current position: {}.",
        distance_phrase(verdict)
    )
}
