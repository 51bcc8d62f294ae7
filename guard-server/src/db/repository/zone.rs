//! Zone Repository
//!
//! 区域注册表。不变量：任何时刻至少有一个 active 区域。
//! 对单个区域的变更按 zone 号加互斥锁串行化；跨区域操作互不排斥。

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tokio::sync::Mutex;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Zone, ZoneCreate, ZoneUpdate};

const TABLE: &str = "zone";

/// Per-zone mutation locks plus a creation lock for id assignment.
/// Lives in GuardState so every repository instance shares one map.
#[derive(Debug, Default)]
pub struct ZoneLocks {
    create: Mutex<()>,
    per_zone: DashMap<i64, Arc<Mutex<()>>>,
}

impl ZoneLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn for_zone(&self, number: i64) -> Arc<Mutex<()>> {
        self.per_zone
            .entry(number)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[derive(Serialize)]
struct ZoneRow {
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    radius_meters: i64,
    active: bool,
}

#[derive(Clone)]
pub struct ZoneRepository {
    base: BaseRepository,
    locks: Arc<ZoneLocks>,
}

impl ZoneRepository {
    pub fn new(db: Surreal<Db>, locks: Arc<ZoneLocks>) -> Self {
        Self {
            base: BaseRepository::new(db),
            locks,
        }
    }

    /// All zones, ascending zone number
    pub async fn find_all(&self) -> RepoResult<Vec<Zone>> {
        let zones: Vec<Zone> = self
            .base
            .db()
            .query("SELECT * FROM zone ORDER BY id")
            .await?
            .take(0)?;
        Ok(zones)
    }

    /// Active zones only, ascending zone number (evaluation order)
    pub async fn find_active(&self) -> RepoResult<Vec<Zone>> {
        let zones: Vec<Zone> = self
            .base
            .db()
            .query("SELECT * FROM zone WHERE active = true ORDER BY id")
            .await?
            .take(0)?;
        Ok(zones)
    }

    pub async fn find_by_number(&self, number: i64) -> RepoResult<Option<Zone>> {
        let zone: Option<Zone> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, number))
            .await?;
        Ok(zone)
    }

    /// Create a zone with key = max existing key + 1; `active` defaults to true
    pub async fn create(&self, data: ZoneCreate) -> RepoResult<Zone> {
        let _guard = self.locks.create.lock().await;

        let next = self
            .find_all()
            .await?
            .iter()
            .filter_map(Zone::number)
            .max()
            .unwrap_or(0)
            + 1;

        let row = ZoneRow {
            name: data.name,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
            radius_meters: data.radius_meters,
            active: data.active.unwrap_or(true),
        };
        let created: Option<Zone> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, next))
            .content(row)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create zone".to_string()))
    }

    /// Patch zone fields (activation changes go through [`toggle`])
    pub async fn update(&self, number: i64, data: ZoneUpdate) -> RepoResult<Zone> {
        let lock = self.locks.for_zone(number);
        let _guard = lock.lock().await;

        self.find_by_number(number)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Zone {number} not found")))?;

        let updated: Option<Zone> = self
            .base
            .db()
            .update(RecordId::from_table_key(TABLE, number))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Zone {number} not found")))
    }

    /// Flip the active flag.
    ///
    /// Deactivating the last active zone self-heals: the flip is reverted and
    /// the still-active zone is returned. This is not an error.
    pub async fn toggle(&self, number: i64) -> RepoResult<Zone> {
        let lock = self.locks.for_zone(number);
        let _guard = lock.lock().await;

        let zone = self
            .find_by_number(number)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Zone {number} not found")))?;

        if zone.active && self.count_active_excluding(number).await? == 0 {
            tracing::warn!(zone = number, "Refusing to deactivate the last active zone");
            return Ok(zone);
        }

        let updated: Option<Zone> = self
            .base
            .db()
            .query("UPDATE $thing SET active = $active RETURN AFTER")
            .bind(("thing", RecordId::from_table_key(TABLE, number)))
            .bind(("active", !zone.active))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Zone {number} not found")))
    }

    /// Delete a zone; rejected when it is the sole remaining zone
    pub async fn delete(&self, number: i64) -> RepoResult<bool> {
        let lock = self.locks.for_zone(number);
        let _guard = lock.lock().await;

        self.find_by_number(number)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Zone {number} not found")))?;

        if self.find_all().await?.len() <= 1 {
            return Err(RepoError::Validation(
                "Cannot delete the last remaining zone".to_string(),
            ));
        }

        let _: Option<Zone> = self
            .base
            .db()
            .delete(RecordId::from_table_key(TABLE, number))
            .await?;

        // Deleting the only active zone would strand the registry; reactivate
        // the lowest-numbered survivor to restore the invariant.
        if self.count_active_excluding(number).await? == 0 {
            if let Some(survivor) = self.find_all().await?.first().and_then(Zone::number) {
                tracing::warn!(
                    deleted = number,
                    reactivated = survivor,
                    "Deleted zone was the last active one; reactivating survivor"
                );
                self.base
                    .db()
                    .query("UPDATE $thing SET active = true")
                    .bind(("thing", RecordId::from_table_key(TABLE, survivor)))
                    .await?;
            }
        }
        Ok(true)
    }

    async fn count_active_excluding(&self, number: i64) -> RepoResult<usize> {
        let zones: Vec<Zone> = self
            .base
            .db()
            .query("SELECT * FROM zone WHERE active = true AND id != $thing")
            .bind(("thing", RecordId::from_table_key(TABLE, number)))
            .await?
            .take(0)?;
        Ok(zones.len())
    }
}
