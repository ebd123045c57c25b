//! SQLite-backed single-record trust store.
//!
//! The `license_record` table holds at most one row. The primary key is pinned
//! to `1` by a CHECK constraint, so a second record cannot exist even if a
//! caller bypasses [`TrustStore::save_record`].

use crate::error::{StoreError, StoreResult};
use crate::record::{LicenseRecord, StoreStats};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Row id of the singleton license record.
const SINGLETON_ID: i64 = 1;

/// Persistent store for the current license record.
///
/// Cloning is cheap and every clone shares the same connection, which is
/// serialized behind a mutex.
#[derive(Clone)]
pub struct TrustStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore").field("path", &self.path).finish()
    }
}

impl TrustStore {
    /// Opens (or creates) a trust store at the given path.
    ///
    /// Missing parent directories are created first.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        info!(path = %path.display(), "Trust store opened");
        Ok(store)
    }

    /// Opens an in-memory trust store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Returns the on-disk location, or `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS license_record (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                token TEXT NOT NULL,
                device_uuid TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                last_check INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns true if a license record exists.
    ///
    /// Never fails: a query error is logged and reported as "no record".
    #[must_use]
    pub fn has_record(&self) -> bool {
        match self.count_records() {
            Ok(n) => n > 0,
            Err(e) => {
                warn!(error = %e, "Failed to check for license record");
                false
            }
        }
    }

    fn count_records(&self) -> StoreResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM license_record", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns the current license record, or `None` if none is stored.
    pub fn get_record(&self) -> StoreResult<Option<LicenseRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT token, device_uuid, is_active, created_at, last_check
                 FROM license_record WHERE id = ?1",
                params![SINGLETON_ID],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((token, device_uuid, is_active, created_ms, checked_ms)) = row else {
            return Ok(None);
        };

        Ok(Some(LicenseRecord {
            token,
            device_uuid,
            is_active,
            created_at: from_millis(created_ms)?,
            last_check_at: from_millis(checked_ms)?,
        }))
    }

    /// Replaces any existing record with a fresh, active one.
    ///
    /// The delete and insert run in one transaction, so a crash part-way
    /// leaves the previous record intact.
    pub fn save_record(&self, token: &str, device_uuid: &str) -> StoreResult<()> {
        if token.trim().is_empty() {
            return Err(StoreError::Validation("token must not be empty".to_string()));
        }
        if device_uuid.trim().is_empty() {
            return Err(StoreError::Validation(
                "device uuid must not be empty".to_string(),
            ));
        }

        let now = Utc::now().timestamp_millis();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM license_record", [])?;
        let inserted = tx.execute(
            "INSERT INTO license_record
                (id, token, device_uuid, is_active, created_at, last_check, updated_at)
             VALUES (?1, ?2, ?3, 1, ?4, ?4, ?4)",
            params![SINGLETON_ID, token, device_uuid, now],
        )?;
        if inserted == 0 {
            // Dropping the transaction rolls it back.
            return Err(StoreError::NothingWritten);
        }
        tx.commit()?;

        info!(device_uuid = %device_uuid, "License record saved");
        Ok(())
    }

    /// Sets `last_check_at` on the current record to now.
    pub fn update_last_check(&self) -> StoreResult<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE license_record SET last_check = ?1, updated_at = ?1 WHERE id = ?2",
            params![now, SINGLETON_ID],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        debug!("License last-check timestamp updated");
        Ok(())
    }

    /// Sets the cached active flag on the current record.
    pub fn update_active_status(&self, active: bool) -> StoreResult<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE license_record SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
            params![active, now, SINGLETON_ID],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(active, "License active status updated");
        Ok(())
    }

    /// Deletes the current record. A no-op when nothing is stored.
    pub fn clear_record(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM license_record", [])?;
        info!(removed, "License record cleared");
        Ok(())
    }

    /// Returns record counters and the most recent check time.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let conn = self.lock()?;
        let (count, active, last_check): (i64, i64, Option<i64>) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN is_active THEN 1 ELSE 0 END), 0),
                    MAX(last_check)
             FROM license_record",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(StoreStats {
            license_count: count.max(0) as u64,
            active_licenses: active.max(0) as u64,
            last_check_at: last_check.map(from_millis).transpose()?,
        })
    }

    /// Verifies the connection is usable by querying the license table.
    pub fn health_check(&self) -> StoreResult<()> {
        let count = self.count_records()?;
        debug!(count, "Trust store health check passed");
        Ok(())
    }
}

fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {ms}")))
}
