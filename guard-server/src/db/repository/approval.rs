//! Approval Workflow Repository
//!
//! 审批请求的创建、查询与状态迁移。
//!
//! - pending → approved/denied 通过条件 UPDATE 做 compare-and-swap，
//!   两个管理员并发处理同一请求时只有一个赢家，输家得到 Conflict。
//! - 过期是惰性的：超过 TTL 的 pending 等同 denied，无需后台任务即可正确；
//!   [`sweep_expired_at`] 只做记账。
//! - 时间相关方法都有 `_at(now_ms)` 形式，墙钟包装在外层。
//!
//! 注意：嵌入式 SurrealDB 在 WHERE + ORDER BY + LIMIT 组合下会丢记录，
//! 这里一律取整个结果集再在 Rust 侧截取。

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tokio::sync::Mutex;

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::CurrentActor;
use crate::db::models::{
    ApprovalAction, ApprovalRequest, ApprovalStatus, LocationSample, Verdict,
};
use crate::utils::now_millis;
use crate::utils::time::{DAY_MS, HOUR_MS};

const TABLE: &str = "location_approval";

/// Workflow timing knobs (config-driven)
#[derive(Debug, Clone, Copy)]
pub struct ApprovalPolicy {
    /// How long an approved grant stays valid (default 8h)
    pub grant_window_ms: i64,
    /// How long an unprocessed request stays decidable (default 24h)
    pub request_ttl_ms: i64,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            grant_window_ms: 8 * HOUR_MS,
            request_ttl_ms: DAY_MS,
        }
    }
}

#[derive(serde::Serialize)]
struct ApprovalRow {
    actor_id: String,
    actor_name: String,
    actor_role: String,
    requested_at: i64,
    sample: LocationSample,
    verdict: Verdict,
    attempt_record_id: String,
    status: ApprovalStatus,
    processed_at: Option<i64>,
    processed_by: Option<String>,
    processed_by_name: Option<String>,
    admin_reason: Option<String>,
    access_expires_at: Option<i64>,
}

/// Per-actor open locks. The check-then-create in
/// [`ApprovalRepository::find_or_create_pending_at`] is two statements, so
/// simultaneous invalid attempts by one actor must serialize or they race
/// into duplicate pending rows. Lives in GuardState so every repository
/// instance shares one map.
#[derive(Debug, Default)]
pub struct ApprovalLocks {
    per_actor: DashMap<String, Arc<Mutex<()>>>,
}

impl ApprovalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn for_actor(&self, actor_id: &str) -> Arc<Mutex<()>> {
        self.per_actor
            .entry(actor_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[derive(Clone)]
pub struct ApprovalRepository {
    base: BaseRepository,
    policy: ApprovalPolicy,
    locks: Arc<ApprovalLocks>,
}

impl ApprovalRepository {
    pub fn new(db: Surreal<Db>, policy: ApprovalPolicy, locks: Arc<ApprovalLocks>) -> Self {
        Self {
            base: BaseRepository::new(db),
            policy,
            locks,
        }
    }

    pub fn policy(&self) -> ApprovalPolicy {
        self.policy
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ApprovalRequest>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        let request: Option<ApprovalRequest> = self.base.db().select(thing).await?;
        Ok(request)
    }

    /// The actor's unexpired pending request, if any
    pub async fn find_pending_for_actor_at(
        &self,
        actor_id: &str,
        now_ms: i64,
    ) -> RepoResult<Option<ApprovalRequest>> {
        let floor = now_ms - self.policy.request_ttl_ms;
        let actor_id = actor_id.to_string();
        let requests: Vec<ApprovalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM location_approval \
                 WHERE actor_id = $actor AND status = 'pending' AND requested_at > $floor \
                 ORDER BY requested_at DESC",
            )
            .bind(("actor", actor_id))
            .bind(("floor", floor))
            .await?
            .take(0)?;
        Ok(requests.into_iter().next())
    }

    /// Idempotent open: repeated invalid attempts inside one session reuse
    /// the existing pending request instead of duplicating it.
    ///
    /// Returns the request and whether it was newly created.
    pub async fn find_or_create_pending_at(
        &self,
        actor: &CurrentActor,
        sample: &LocationSample,
        verdict: &Verdict,
        attempt_record_id: &str,
        now_ms: i64,
    ) -> RepoResult<(ApprovalRequest, bool)> {
        // Check-then-create serializes per actor; see ApprovalLocks
        let lock = self.locks.for_actor(&actor.id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.find_pending_for_actor_at(&actor.id, now_ms).await? {
            return Ok((existing, false));
        }

        let row = ApprovalRow {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            actor_role: actor.role.to_string(),
            requested_at: now_ms,
            sample: sample.clone(),
            verdict: verdict.clone(),
            attempt_record_id: attempt_record_id.to_string(),
            status: ApprovalStatus::Pending,
            processed_at: None,
            processed_by: None,
            processed_by_name: None,
            admin_reason: None,
            access_expires_at: None,
        };
        let created: Option<ApprovalRequest> = self.base.db().create(TABLE).content(row).await?;
        let request = created
            .ok_or_else(|| RepoError::Database("Failed to create approval request".to_string()))?;
        Ok((request, true))
    }

    /// Decide a pending request. Compare-and-swap on `status = 'pending'`:
    /// exactly one of two concurrent decisions lands, the other observes a
    /// Conflict and the first decision stands.
    pub async fn process_at(
        &self,
        id: &str,
        action: ApprovalAction,
        admin: &CurrentActor,
        reason: Option<String>,
        now_ms: i64,
    ) -> RepoResult<ApprovalRequest> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Approval request {id} not found")))?;

        let (new_status, expires) = match action {
            ApprovalAction::Approve => (
                ApprovalStatus::Approved,
                Some(now_ms + self.policy.grant_window_ms),
            ),
            ApprovalAction::Deny => (ApprovalStatus::Denied, None),
        };
        let ttl_floor = now_ms - self.policy.request_ttl_ms;

        let updated: Option<ApprovalRequest> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET \
                    status = $status, \
                    processed_at = $now, \
                    processed_by = $admin_id, \
                    processed_by_name = $admin_name, \
                    admin_reason = $reason, \
                    access_expires_at = $expires \
                 WHERE status = 'pending' AND requested_at > $floor \
                 RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("status", new_status))
            .bind(("now", now_ms))
            .bind(("admin_id", admin.id.clone()))
            .bind(("admin_name", admin.name.clone()))
            .bind(("reason", reason))
            .bind(("expires", expires))
            .bind(("floor", ttl_floor))
            .await?
            .take(0)?;

        match updated {
            Some(request) => Ok(request),
            None if existing.is_request_expired_at(now_ms, self.policy.request_ttl_ms) => {
                Err(RepoError::Conflict(
                    "Approval request expired without review".to_string(),
                ))
            }
            None => Err(RepoError::Conflict(
                "Approval request already processed".to_string(),
            )),
        }
    }

    /// Most recent approved request still inside its access window.
    /// Lazy expiry: an expired grant simply stops matching.
    pub async fn has_valid_approval_at(
        &self,
        actor_id: &str,
        now_ms: i64,
    ) -> RepoResult<Option<ApprovalRequest>> {
        let actor_id = actor_id.to_string();
        let requests: Vec<ApprovalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM location_approval \
                 WHERE actor_id = $actor AND status = 'approved' \
                 ORDER BY processed_at DESC",
            )
            .bind(("actor", actor_id))
            .await?
            .take(0)?;
        Ok(requests
            .into_iter()
            .next()
            .filter(|r| r.grants_access_at(now_ms)))
    }

    /// The actor's most recent explicit denial still inside the request TTL
    pub async fn find_recent_denial_at(
        &self,
        actor_id: &str,
        now_ms: i64,
    ) -> RepoResult<Option<ApprovalRequest>> {
        let floor = now_ms - self.policy.request_ttl_ms;
        let actor_id = actor_id.to_string();
        let requests: Vec<ApprovalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM location_approval \
                 WHERE actor_id = $actor AND status = 'denied' AND requested_at > $floor \
                 ORDER BY processed_at DESC",
            )
            .bind(("actor", actor_id))
            .bind(("floor", floor))
            .await?
            .take(0)?;
        Ok(requests.into_iter().next())
    }

    /// Unexpired pending requests, oldest first (admin review queue)
    pub async fn list_pending_at(&self, now_ms: i64) -> RepoResult<Vec<ApprovalRequest>> {
        let floor = now_ms - self.policy.request_ttl_ms;
        let requests: Vec<ApprovalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM location_approval \
                 WHERE status = 'pending' AND requested_at > $floor \
                 ORDER BY requested_at ASC",
            )
            .bind(("floor", floor))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Bookkeeping: flip TTL-expired pending rows to denied. Correctness does
    /// not depend on this running; expiry is already lazy everywhere.
    pub async fn sweep_expired_at(&self, now_ms: i64) -> RepoResult<usize> {
        let floor = now_ms - self.policy.request_ttl_ms;
        let swept: Vec<ApprovalRequest> = self
            .base
            .db()
            .query(
                "UPDATE location_approval SET \
                    status = 'denied', \
                    processed_at = $now, \
                    admin_reason = 'Request expired without review' \
                 WHERE status = 'pending' AND requested_at <= $floor \
                 RETURN AFTER",
            )
            .bind(("now", now_ms))
            .bind(("floor", floor))
            .await?
            .take(0)?;
        Ok(swept.len())
    }

    // ===== Wall-clock wrappers =====

    pub async fn find_pending_for_actor(
        &self,
        actor_id: &str,
    ) -> RepoResult<Option<ApprovalRequest>> {
        self.find_pending_for_actor_at(actor_id, now_millis()).await
    }

    pub async fn process(
        &self,
        id: &str,
        action: ApprovalAction,
        admin: &CurrentActor,
        reason: Option<String>,
    ) -> RepoResult<ApprovalRequest> {
        self.process_at(id, action, admin, reason, now_millis()).await
    }

    pub async fn has_valid_approval(
        &self,
        actor_id: &str,
    ) -> RepoResult<Option<ApprovalRequest>> {
        self.has_valid_approval_at(actor_id, now_millis()).await
    }

    pub async fn list_pending(&self) -> RepoResult<Vec<ApprovalRequest>> {
        self.list_pending_at(now_millis()).await
    }

    pub async fn sweep_expired(&self) -> RepoResult<usize> {
        self.sweep_expired_at(now_millis()).await
    }
}
