//! Alert Repository
//!
//! One violation alert per invalid attempt. No dedup across repeated
//! attempts by the same actor; distance and time differ each attempt.

use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Alert, AlertSeverity, AlertStatus, AlertType, AttemptRecord};

const TABLE: &str = "admin_alert";

#[derive(Serialize)]
struct AlertRow {
    alert_type: AlertType,
    severity: AlertSeverity,
    actor_id: String,
    actor_name: String,
    distance_meters: i64,
    attempt_record_id: String,
    created_at: i64,
    status: AlertStatus,
    requires_action: bool,
}

#[derive(Clone)]
pub struct AlertRepository {
    base: BaseRepository,
}

impl AlertRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Raise a violation alert for one denied attempt
    pub async fn raise(&self, attempt: &AttemptRecord, now_ms: i64) -> RepoResult<Alert> {
        let row = AlertRow {
            alert_type: AlertType::LocationViolation,
            severity: AlertSeverity::for_distance(attempt.verdict.distance_meters),
            actor_id: attempt.actor_id.clone(),
            actor_name: attempt.actor_name.clone(),
            distance_meters: attempt.verdict.distance_meters,
            attempt_record_id: attempt.id_string(),
            created_at: now_ms,
            status: AlertStatus::Unread,
            requires_action: true,
        };
        let created: Option<Alert> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create alert".to_string()))
    }

    /// Alerts for review, newest first, optionally filtered by read status
    pub async fn find_all(&self, status: Option<AlertStatus>) -> RepoResult<Vec<Alert>> {
        let alerts: Vec<Alert> = match status {
            Some(status) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM admin_alert WHERE status = $status \
                         ORDER BY created_at DESC",
                    )
                    .bind(("status", status))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM admin_alert ORDER BY created_at DESC")
                    .await?
                    .take(0)?
            }
        };
        Ok(alerts)
    }

    /// Mark one alert read; the only mutation alerts support
    pub async fn mark_read(&self, id: &str) -> RepoResult<Alert> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        let updated: Option<Alert> = self
            .base
            .db()
            .query("UPDATE $thing SET status = 'read' RETURN AFTER")
            .bind(("thing", thing))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Alert {id} not found")))
    }
}
