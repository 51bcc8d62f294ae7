//! Repository Module
//!
//! One repository per persisted collection:
//!
//! - [`ZoneRepository`] — geofence configuration (`zone`)
//! - [`AttemptLogRepository`] — append-only access audit (`location_log`)
//! - [`ApprovalRepository`] — approval workflow rows (`location_approval`)
//! - [`AlertRepository`] — violation alerts (`admin_alert`)

pub mod alert;
pub mod approval;
pub mod attempt_log;
pub mod zone;

// Re-exports
pub use alert::AlertRepository;
pub use approval::{ApprovalLocks, ApprovalPolicy, ApprovalRepository};
pub use attempt_log::AttemptLogRepository;
pub use zone::{ZoneLocks, ZoneRepository};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: the whole stack uses the "table:id" string form
// =============================================================================
//
// surrealdb::RecordId handles every id:
//   - parse:       let id: RecordId = "location_approval:abc".parse()?;
//   - construct:   let id = RecordId::from_table_key("zone", 7);
//   - CRUD:        db.select(id) / db.delete(id) take RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
