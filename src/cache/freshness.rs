//! Freshness policy.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Whether a snapshot written at `written_at` is still valid at `now`.
///
/// Fresh means strictly younger than `ttl`. A timestamp in the future
/// (clock skew between writers) counts as fresh.
pub fn is_fresh(written_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - written_at).to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}
