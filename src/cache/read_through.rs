//! Read-through orchestration over a [`CacheStore`].

use super::clock::Clock;
use super::freshness::is_fresh;
use super::key::CacheKey;
use super::store::{CacheEntry, CacheStore};
use crate::error::{StoreError, StoreResult};
use crate::metrics::Metrics;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Fresh,
}

/// A payload tagged with its [`Source`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub payload: T,
    pub source: Source,
}

/// Wraps a fetch+normalize unit with a store and a freshness check.
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl ReadThroughCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, metrics: Metrics) -> Self {
        Self {
            store,
            clock,
            metrics,
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Run a store operation on the blocking pool.
    async fn blocking<R, F>(&self, op: F) -> StoreResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&dyn CacheStore) -> StoreResult<R> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn latest(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>> {
        let key = key.clone();
        self.blocking(move |store| store.latest(&key)).await
    }

    async fn insert(&self, key: &CacheKey, payload: String) -> StoreResult<()> {
        let key = key.clone();
        let written_at = self.clock.now();
        self.blocking(move |store| store.put(&key, &payload, written_at))
            .await
    }

    /// Keep only the latest snapshot per key.
    pub async fn compact(&self) -> StoreResult<usize> {
        self.blocking(|store| store.compact()).await
    }

    /// Serve `key` from the store if younger than `ttl`, otherwise run `fetch`.
    ///
    /// A fresh hit never invokes `fetch`. A successful fetch is inserted as a
    /// new snapshot and tagged [`Source::Fresh`]. A failed fetch is returned
    /// untouched and nothing is written.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let now = self.clock.now();

        if let Some(entry) = self.latest(key).await? {
            if is_fresh(entry.written_at, now, ttl) {
                let payload: T =
                    serde_json::from_str(&entry.payload).map_err(StoreError::from)?;
                self.metrics.record_cache_access(true);
                tracing::debug!(key = %key, "Cache hit");
                return Ok(Cached {
                    payload,
                    source: Source::Cache,
                });
            }
        }

        self.metrics.record_cache_access(false);
        tracing::debug!(key = %key, "Cache miss, fetching upstream");

        let payload = fetch().await?;
        let serialized = serde_json::to_string(&payload).map_err(StoreError::from)?;
        self.insert(key, serialized).await?;

        Ok(Cached {
            payload,
            source: Source::Fresh,
        })
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache").finish_non_exhaustive()
    }
}
