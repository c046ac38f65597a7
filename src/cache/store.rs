//! Cache store capability and the in-process implementation.

use super::key::CacheKey;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One stored snapshot. Never mutated after insert.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: String,
    pub written_at: DateTime<Utc>,
}

/// Durable mapping from a key to its snapshots.
///
/// Append-only per key: `put` always inserts, and `latest` returns the most
/// recent insert for the key.
pub trait CacheStore: Send + Sync {
    /// Insert a new snapshot.
    fn put(&self, key: &CacheKey, payload: &str, written_at: DateTime<Utc>) -> StoreResult<()>;

    /// The most recently inserted snapshot for `key`.
    fn latest(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>>;

    /// Drop every snapshot except the latest per key. Returns rows removed.
    fn compact(&self) -> StoreResult<usize>;
}

/// A thread-safe in-memory store.
///
/// Cloning is cheap and clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryCacheStore {
    rows: Arc<RwLock<HashMap<CacheKey, Vec<CacheEntry>>>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored snapshots across all keys.
    pub fn len(&self) -> usize {
        match self.rows.read() {
            Ok(rows) => rows.values().map(Vec::len).sum(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of snapshots stored for `key`.
    pub fn count_for(&self, key: &CacheKey) -> usize {
        match self.rows.read() {
            Ok(rows) => rows.get(key).map(Vec::len).unwrap_or(0),
            Err(_) => 0,
        }
    }
}

impl CacheStore for InMemoryCacheStore {
    fn put(&self, key: &CacheKey, payload: &str, written_at: DateTime<Utc>) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.entry(key.clone()).or_default().push(CacheEntry {
            key: key.clone(),
            payload: payload.to_string(),
            written_at,
        });
        Ok(())
    }

    fn latest(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(key).and_then(|entries| entries.last()).cloned())
    }

    fn compact(&self) -> StoreResult<usize> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let mut removed = 0;
        for entries in rows.values_mut() {
            if entries.len() > 1 {
                removed += entries.len() - 1;
                entries.drain(..entries.len() - 1);
            }
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for InMemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCacheStore")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::ResourceKind;
    use chrono::Duration;
    use std::thread;

    fn key(address: &str) -> CacheKey {
        CacheKey::new(ResourceKind::Balance, "testnet", [address])
    }

    #[test]
    fn test_put_and_latest() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();
        store.put(&key("0x1"), "{\"balance\":\"1\"}", now).unwrap();

        let entry = store.latest(&key("0x1")).unwrap().unwrap();
        assert_eq!(entry.payload, "{\"balance\":\"1\"}");
        assert_eq!(entry.written_at, now);
        assert!(store.latest(&key("0x2")).unwrap().is_none());
    }

    #[test]
    fn test_latest_is_most_recent_insert() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();
        store.put(&key("0x1"), "first", now).unwrap();
        // Older timestamp inserted later still wins: latest means last insert.
        store.put(&key("0x1"), "second", now - Duration::seconds(10)).unwrap();

        assert_eq!(store.latest(&key("0x1")).unwrap().unwrap().payload, "second");
        assert_eq!(store.count_for(&key("0x1")), 2);
    }

    #[test]
    fn test_compact_keeps_latest_per_key() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();
        for i in 0..3 {
            store.put(&key("0x1"), &format!("a{}", i), now).unwrap();
        }
        store.put(&key("0x2"), "b0", now).unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.compact().unwrap(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest(&key("0x1")).unwrap().unwrap().payload, "a2");
    }

    #[test]
    fn test_clone_shares_rows() {
        let store1 = InMemoryCacheStore::new();
        let store2 = store1.clone();
        store2.put(&key("0x1"), "shared", Utc::now()).unwrap();
        assert_eq!(store1.latest(&key("0x1")).unwrap().unwrap().payload, "shared");
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = InMemoryCacheStore::new();
        let store_clone = store.clone();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                store_clone
                    .put(&key(&format!("0x{}", i)), "v", Utc::now())
                    .unwrap();
            }
        });

        for i in 100..200 {
            store.put(&key(&format!("0x{}", i)), "v", Utc::now()).unwrap();
        }

        handle.join().unwrap();
        assert_eq!(store.len(), 200);
    }
}
