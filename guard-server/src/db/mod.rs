//! Database Module
//!
//! Embedded SurrealDB storage. Production runs on RocksDB under the work
//! directory; tests use the in-memory engine through the same schema setup.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(&db).await?;
        tracing::info!(path = %db_path, "Database connection established (RocksDB)");
        Ok(Self { db })
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;
        Self::prepare(&db).await?;
        Ok(Self { db })
    }

    async fn prepare(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns("guard")
            .use_db("guard")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        // Idempotent schema setup: indexes back the query paths in §repository
        let schema = r#"
            DEFINE TABLE IF NOT EXISTS zone SCHEMALESS;

            DEFINE TABLE IF NOT EXISTS location_log SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS log_captured_at ON location_log FIELDS captured_at;
            DEFINE INDEX IF NOT EXISTS log_actor ON location_log FIELDS actor_id;

            DEFINE TABLE IF NOT EXISTS location_approval SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS approval_actor_status ON location_approval FIELDS actor_id, status;
            DEFINE INDEX IF NOT EXISTS approval_status_requested ON location_approval FIELDS status, requested_at;

            DEFINE TABLE IF NOT EXISTS admin_alert SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS alert_type_status ON admin_alert FIELDS alert_type, status;
        "#;
        db.query(schema)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        Ok(())
    }
}
