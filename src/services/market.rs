//! Upstream fetcher for the market-data API.

use crate::client::HttpFetch;
use crate::error::ServiceResult;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct MarketFetcher {
    http: Arc<dyn HttpFetch>,
    base_url: String,
    coin_id: String,
    timeout: Duration,
}

impl MarketFetcher {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>, coin_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            coin_id: coin_id.into(),
            timeout,
        }
    }

    /// Full coin snapshot, unnormalized.
    pub async fn coin(&self) -> ServiceResult<Value> {
        let url = format!(
            "{}/coins/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.coin_id)
        );
        Ok(self.http.get_json(&url, self.timeout).await?)
    }
}

impl std::fmt::Debug for MarketFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketFetcher")
            .field("base_url", &self.base_url)
            .field("coin_id", &self.coin_id)
            .finish_non_exhaustive()
    }
}
