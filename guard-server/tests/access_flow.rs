//! End-to-end access checks against the in-memory engine: evaluate, audit,
//! alert, and the approval escalation path.
//! Run: cargo test -p guard-server --test access_flow

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use guard_server::GuardState;
use guard_server::access::AccessDecision;
use guard_server::auth::{ActorRole, CurrentActor};
use guard_server::db::models::{
    Alert, AlertSeverity, AlertStatus, ApprovalAction, ApprovalRequest, AttemptStatus,
    LocationSample, ZoneCreate,
};
use guard_server::location::{LocationError, LocationProvider};
use guard_server::notify::NotificationDispatcher;
use guard_server::utils::AppError;

// Factory gate in Kathmandu; samples below are relative to it
const ZONE_LAT: f64 = 27.7172;
const ZONE_LON: f64 = 85.3240;
// 1 degree of latitude ~= 111_195 m, so this offset is ~2 km
const TWO_KM_LAT: f64 = 2.0 * 0.0089932;

struct CountingDispatcher {
    alerts: AtomicUsize,
    resolutions: AtomicUsize,
}

impl CountingDispatcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            alerts: AtomicUsize::new(0),
            resolutions: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for CountingDispatcher {
    async fn alert_raised(&self, _alert: &Alert) {
        self.alerts.fetch_add(1, Ordering::SeqCst);
    }

    async fn approval_resolved(&self, _request: &ApprovalRequest) {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
    }
}

async fn seeded_state() -> GuardState {
    let state = GuardState::for_tests().await.unwrap();
    state
        .zones()
        .create(ZoneCreate {
            name: "Main Factory".to_string(),
            address: "Kathmandu".to_string(),
            latitude: ZONE_LAT,
            longitude: ZONE_LON,
            radius_meters: 500,
            active: None,
        })
        .await
        .unwrap();
    state
}

fn operator() -> CurrentActor {
    CurrentActor {
        id: "emp:42".to_string(),
        name: "Asha".to_string(),
        role: ActorRole::Operator,
    }
}

fn admin() -> CurrentActor {
    CurrentActor {
        id: "emp:1".to_string(),
        name: "Bikram".to_string(),
        role: ActorRole::Admin,
    }
}

fn sample_at(lat: f64, lon: f64, captured_at: i64) -> LocationSample {
    LocationSample {
        latitude: lat,
        longitude: lon,
        accuracy_meters: 15.0,
        captured_at,
        speed: None,
        heading: None,
    }
}

#[tokio::test]
async fn in_zone_sample_is_granted_and_audited() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();

    let outcome = guard
        .check_access_at(&actor, &sample_at(ZONE_LAT, ZONE_LON, 1_000), 1_000)
        .await
        .unwrap();

    assert_eq!(outcome.decision, AccessDecision::Granted);
    assert!(outcome.verdict.is_valid);
    assert!(!outcome.bypass);
    assert!(outcome.approval_id.is_none());

    let log = state.attempts().find_by_actor(&actor.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].status, AttemptStatus::Approved);
    assert_eq!(log[0].id_string(), outcome.attempt_record_id);
}

#[tokio::test]
async fn out_of_zone_sample_opens_one_request_one_alert_one_record() {
    let state = seeded_state().await;
    let dispatcher = CountingDispatcher::new();
    let state = state.with_dispatcher(dispatcher.clone());
    let guard = state.access_guard();
    let actor = operator();

    let outcome = guard
        .check_access_at(&actor, &sample_at(ZONE_LAT + TWO_KM_LAT, ZONE_LON, 1_000), 1_000)
        .await
        .unwrap();

    assert_eq!(outcome.decision, AccessDecision::Pending);
    assert!(!outcome.verdict.is_valid);
    assert!((1_980..=2_020).contains(&outcome.verdict.distance_meters));
    assert!(outcome.message.contains("Awaiting administrator approval"));

    // Exactly one audit row, one pending request, one alert
    let log = state.attempts().find_by_actor(&actor.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].status, AttemptStatus::Denied);

    let pending = state.approvals().list_pending_at(1_000).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(Some(pending[0].id_string()), outcome.approval_id);
    assert_eq!(pending[0].attempt_record_id, outcome.attempt_record_id);

    let alerts = state.alerts().find_all(None).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].status, AlertStatus::Unread);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    assert_eq!(dispatcher.alerts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_attempts_reuse_the_pending_request_but_alert_each_time() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();
    let sample = sample_at(ZONE_LAT + TWO_KM_LAT, ZONE_LON, 1_000);

    let first = guard.check_access_at(&actor, &sample, 1_000).await.unwrap();
    let second = guard.check_access_at(&actor, &sample, 2_000).await.unwrap();

    assert_eq!(second.decision, AccessDecision::Pending);
    assert_eq!(first.approval_id, second.approval_id);
    assert_eq!(state.approvals().list_pending_at(2_000).await.unwrap().len(), 1);
    assert_eq!(state.attempts().find_by_actor(&actor.id).await.unwrap().len(), 2);
    assert_eq!(state.alerts().find_all(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn approved_request_grants_subsequent_checks_until_expiry() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();
    let sample = sample_at(ZONE_LAT + TWO_KM_LAT, ZONE_LON, 1_000);

    let pending = guard.check_access_at(&actor, &sample, 1_000).await.unwrap();
    let request_id = pending.approval_id.unwrap();

    state
        .approvals()
        .process_at(&request_id, ApprovalAction::Approve, &admin(), None, 2_000)
        .await
        .unwrap();

    let granted = guard.check_access_at(&actor, &sample, 3_000).await.unwrap();
    assert_eq!(granted.decision, AccessDecision::Granted);
    assert_eq!(granted.approval_id, Some(request_id.clone()));
    assert!(!granted.verdict.is_valid, "grant comes from approval, not the geofence");

    // One millisecond past the grant window a new check escalates again
    let window = state.approvals().policy().grant_window_ms;
    let after = guard
        .check_access_at(&actor, &sample, 2_000 + window + 1)
        .await
        .unwrap();
    assert_eq!(after.decision, AccessDecision::Pending);
    assert_ne!(after.approval_id, Some(request_id));
}

#[tokio::test]
async fn denied_request_blocks_new_requests_for_its_ttl() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();
    let sample = sample_at(ZONE_LAT + TWO_KM_LAT, ZONE_LON, 1_000);

    let pending = guard.check_access_at(&actor, &sample, 1_000).await.unwrap();
    let request_id = pending.approval_id.unwrap();
    state
        .approvals()
        .process_at(&request_id, ApprovalAction::Deny, &admin(), Some("Stay on site".into()), 2_000)
        .await
        .unwrap();

    let denied = guard.check_access_at(&actor, &sample, 3_000).await.unwrap();
    assert_eq!(denied.decision, AccessDecision::Denied);
    assert_eq!(denied.approval_id, Some(request_id));
    assert!(state.approvals().list_pending_at(3_000).await.unwrap().is_empty());

    // Past the TTL the denial no longer binds and a fresh request opens
    let ttl = state.approvals().policy().request_ttl_ms;
    let reopened = guard
        .check_access_at(&actor, &sample, 1_000 + ttl + 1)
        .await
        .unwrap();
    assert_eq!(reopened.decision, AccessDecision::Pending);
}

#[tokio::test]
async fn admin_role_bypasses_the_geofence_but_is_still_audited() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = admin();

    let outcome = guard
        .check_access_at(&actor, &sample_at(ZONE_LAT + TWO_KM_LAT, ZONE_LON, 1_000), 1_000)
        .await
        .unwrap();

    assert_eq!(outcome.decision, AccessDecision::Granted);
    assert!(outcome.bypass);
    assert!(!outcome.verdict.is_valid);

    // The bypass still leaves an audit row and raises no alert
    let log = state.attempts().find_by_actor(&actor.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].status, AttemptStatus::Denied);
    assert!(state.alerts().find_all(None).await.unwrap().is_empty());
    assert!(state.approvals().list_pending_at(1_000).await.unwrap().is_empty());
}

#[tokio::test]
async fn far_violations_raise_critical_alerts() {
    let state = seeded_state().await;
    let guard = state.access_guard();

    // ~10 km north of the zone
    let sample = sample_at(ZONE_LAT + 5.0 * TWO_KM_LAT, ZONE_LON, 1_000);
    guard.check_access_at(&operator(), &sample, 1_000).await.unwrap();

    let alerts = state.alerts().find_all(Some(AlertStatus::Unread)).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Critical);

    let read = state.alerts().mark_read(&alerts[0].id_string()).await.unwrap();
    assert_eq!(read.status, AlertStatus::Read);
    assert!(state.alerts().find_all(Some(AlertStatus::Unread)).await.unwrap().is_empty());
}

struct BrokenProvider;

#[async_trait]
impl LocationProvider for BrokenProvider {
    async fn current_location(&self) -> Result<LocationSample, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

struct GateProvider;

#[async_trait]
impl LocationProvider for GateProvider {
    async fn current_location(&self) -> Result<LocationSample, LocationError> {
        Ok(sample_at(ZONE_LAT, ZONE_LON, 1_000))
    }
}

#[tokio::test]
async fn provider_failure_fails_closed_without_an_audit_row() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();

    let err = guard
        .check_access_via(&BrokenProvider, &actor, state.config.location_timeout())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Location(LocationError::PermissionDenied)));

    // Nothing was evaluated, so nothing was logged or escalated
    assert!(state.attempts().find_by_actor(&actor.id).await.unwrap().is_empty());
    assert!(state.approvals().list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_path_runs_the_same_pipeline() {
    let state = seeded_state().await;
    let guard = state.access_guard();
    let actor = operator();

    let outcome = guard
        .check_access_via(&GateProvider, &actor, state.config.location_timeout())
        .await
        .unwrap();
    assert_eq!(outcome.decision, AccessDecision::Granted);
    assert_eq!(state.attempts().find_by_actor(&actor.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn no_active_zone_reports_no_nearest_zone() {
    // Bypass the registry guard rails by never creating a zone at all
    let state = GuardState::for_tests().await.unwrap();
    let guard = state.access_guard();

    let outcome = guard
        .check_access_at(&operator(), &sample_at(ZONE_LAT, ZONE_LON, 1_000), 1_000)
        .await
        .unwrap();

    assert_eq!(outcome.decision, AccessDecision::Pending);
    assert!(outcome.verdict.nearest_zone_id.is_none());
    assert_eq!(outcome.verdict.considered_zone_count, 0);
    assert!(outcome.message.contains("no active factory zone"));
}
