//! Upstream fetchers for the block explorer.

use crate::client::HttpFetch;
use crate::error::{ServiceResult, UpstreamError};
use crate::models::{CataloguePage, ExplorerEnvelope};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use urlencoding::encode;

/// Builds explorer requests against a base URL and returns raw upstream shapes.
#[derive(Clone)]
pub struct ExplorerFetcher {
    http: Arc<dyn HttpFetch>,
    timeout: Duration,
}

impl ExplorerFetcher {
    pub fn new(http: Arc<dyn HttpFetch>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    async fn get(&self, url: String) -> ServiceResult<Value> {
        Ok(self.http.get_json(&url, self.timeout).await?)
    }

    /// `module/action` call, unwrapped from its envelope.
    async fn account_action(&self, base: &str, query: String) -> ServiceResult<Value> {
        let raw = self.get(format!("{}/api?module=account&{}", base, query)).await?;
        Ok(ExplorerEnvelope::from_value(raw)?.into_result()?)
    }

    /// Native balance in wei.
    pub async fn balance(&self, base: &str, address: &str) -> ServiceResult<Value> {
        self.account_action(base, format!("action=balance&address={}", encode(address)))
            .await
    }

    /// ERC-20 token list with balances.
    pub async fn token_list(&self, base: &str, address: &str) -> ServiceResult<Value> {
        self.account_action(base, format!("action=tokenlist&address={}", encode(address)))
            .await
    }

    /// One page of the normal transaction list.
    pub async fn transactions(&self, base: &str, address: &str, page: u32, limit: u32) -> ServiceResult<Value> {
        self.account_action(
            base,
            format!(
                "action=txlist&address={}&page={}&offset={}",
                encode(address),
                page,
                limit
            ),
        )
        .await
    }

    pub async fn address_info(&self, base: &str, address: &str) -> ServiceResult<Value> {
        self.get(format!("{}/v2/addresses/{}", base, encode(address)))
            .await
    }

    pub async fn address_tokens(&self, base: &str, address: &str) -> ServiceResult<Value> {
        self.get(format!("{}/v2/addresses/{}/tokens", base, encode(address)))
            .await
    }

    /// ERC-721 collections known to the explorer.
    pub async fn nft_catalogue(&self, base: &str) -> ServiceResult<CataloguePage> {
        let raw = self.get(format!("{}/v2/tokens?type=ERC-721", base)).await?;
        Ok(serde_json::from_value(raw).map_err(UpstreamError::from)?)
    }

    /// Whether the explorer answers at all.
    pub async fn test_connection(&self, base: &str) -> bool {
        let url = format!("{}/api?module=block&action=eth_block_number", base);
        match self.http.get_json(&url, self.timeout).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Explorer connectivity check failed: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for ExplorerFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerFetcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
