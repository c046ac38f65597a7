//! Read-through caching for upstream resources.
//!
//! Snapshots are appended to a [`CacheStore`] keyed by [`CacheKey`]. The
//! [`ReadThroughCache`] decides with [`is_fresh`] whether the latest snapshot
//! can be served or the upstream must be asked again.

pub mod clock;
pub mod freshness;
pub mod key;
pub mod read_through;
pub mod sqlite_store;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use freshness::is_fresh;
pub use key::{CacheKey, ResourceKind, GLOBAL_SCOPE, MAX_KEY_PARAMS};
pub use read_through::{Cached, ReadThroughCache, Source};
pub use sqlite_store::SqliteCacheStore;
pub use store::{CacheEntry, CacheStore, InMemoryCacheStore};
