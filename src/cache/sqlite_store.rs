//! SQLite-backed cache store.

use super::key::CacheKey;
use super::store::{CacheEntry, CacheStore};
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cache_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        scope TEXT NOT NULL,
        p1 TEXT NOT NULL DEFAULT '',
        p2 TEXT NOT NULL DEFAULT '',
        p3 TEXT NOT NULL DEFAULT '',
        payload TEXT NOT NULL,
        written_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_cache_entries_lookup
        ON cache_entries(kind, scope, p1, p2, p3, id);
";

/// Append-only snapshot table in SQLite.
///
/// Each `put` is one row; `latest` reads the highest row id for the key.
pub struct SqliteCacheStore {
    conn: Mutex<Connection>,
}

impl SqliteCacheStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Total number of rows across all keys.
    pub fn row_count(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl CacheStore for SqliteCacheStore {
    fn put(&self, key: &CacheKey, payload: &str, written_at: DateTime<Utc>) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO cache_entries (kind, scope, p1, p2, p3, payload, written_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                key.kind().as_str(),
                key.scope(),
                key.param(0),
                key.param(1),
                key.param(2),
                payload,
                written_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn latest(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let row = conn
            .query_row(
                "SELECT payload, written_at FROM cache_entries
                 WHERE kind = ?1 AND scope = ?2 AND p1 = ?3 AND p2 = ?4 AND p3 = ?5
                 ORDER BY id DESC LIMIT 1",
                params![
                    key.kind().as_str(),
                    key.scope(),
                    key.param(0),
                    key.param(1),
                    key.param(2),
                ],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(payload, written_at)| CacheEntry {
            key: key.clone(),
            payload,
            written_at: timestamp_from_millis(written_at),
        }))
    }

    fn compact(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let removed = conn.execute(
            "DELETE FROM cache_entries WHERE id NOT IN (
                SELECT MAX(id) FROM cache_entries GROUP BY kind, scope, p1, p2, p3
             )",
            [],
        )?;
        Ok(removed)
    }
}

impl std::fmt::Debug for SqliteCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCacheStore").finish_non_exhaustive()
    }
}
