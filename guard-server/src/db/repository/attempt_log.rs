//! Attempt Log Repository
//!
//! Append-only audit of every access check. Writes never fail silently: a
//! storage error surfaces to the caller, who must fail closed rather than
//! treat it as a grant.

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::CurrentActor;
use crate::db::models::{AttemptRecord, AttemptStatus, LocationSample, Verdict};

const TABLE: &str = "location_log";

#[derive(Serialize)]
struct AttemptRow {
    actor_id: String,
    actor_name: String,
    actor_role: String,
    sample: LocationSample,
    verdict: Verdict,
    captured_at: i64,
    status: AttemptStatus,
}

#[derive(Clone)]
pub struct AttemptLogRepository {
    base: BaseRepository,
}

impl AttemptLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one audit row; status mirrors the verdict at write time
    pub async fn record(
        &self,
        actor: &CurrentActor,
        sample: &LocationSample,
        verdict: &Verdict,
        now_ms: i64,
    ) -> RepoResult<AttemptRecord> {
        let row = AttemptRow {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            actor_role: actor.role.to_string(),
            sample: sample.clone(),
            verdict: verdict.clone(),
            captured_at: now_ms,
            status: AttemptStatus::from_verdict(verdict),
        };
        let created: Option<AttemptRecord> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to persist attempt record".to_string()))
    }

    /// All records captured at or after the cutoff, newest first
    pub async fn find_since(&self, cutoff_ms: i64) -> RepoResult<Vec<AttemptRecord>> {
        let records: Vec<AttemptRecord> = self
            .base
            .db()
            .query("SELECT * FROM location_log WHERE captured_at >= $cutoff ORDER BY captured_at DESC")
            .bind(("cutoff", cutoff_ms))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Audit trail for one actor, newest first
    pub async fn find_by_actor(&self, actor_id: &str) -> RepoResult<Vec<AttemptRecord>> {
        let actor_id = actor_id.to_string();
        let records: Vec<AttemptRecord> = self
            .base
            .db()
            .query("SELECT * FROM location_log WHERE actor_id = $actor ORDER BY captured_at DESC")
            .bind(("actor", actor_id))
            .await?
            .take(0)?;
        Ok(records)
    }
}
