//! Cached single-resource reads.
//!
//! Each operation is one read-through unit: key, TTL, and a fetch that
//! normalizes before anything reaches the store.

use super::context::RequestContext;
use super::explorer::ExplorerFetcher;
use super::market::MarketFetcher;
use crate::cache::{CacheKey, Cached, ReadThroughCache, ResourceKind, GLOBAL_SCOPE};
use crate::domain::Address;
use crate::error::{ServiceError, ServiceResult};
use crate::normalize::{
    normalize_address_info, normalize_address_tokens, normalize_balance, normalize_market_info,
    normalize_token_balances, normalize_transactions,
};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;

/// Canonical form of an address path parameter.
///
/// Full 20-byte addresses are checksummed. Anything else is passed through
/// as long as it is plain alphanumeric, and the explorer decides.
pub fn canonical_address(raw: &str) -> ServiceResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput("address is required".to_string()));
    }
    if let Ok(address) = Address::parse(trimmed) {
        return Ok(address.to_string());
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ServiceError::InvalidInput(format!("invalid address {}", trimmed)));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct ResourceService {
    cache: ReadThroughCache,
    explorer: ExplorerFetcher,
    market: MarketFetcher,
    chain_ttl: Duration,
    market_ttl: Duration,
}

impl ResourceService {
    pub fn new(
        cache: ReadThroughCache,
        explorer: ExplorerFetcher,
        market: MarketFetcher,
        chain_ttl: Duration,
        market_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            explorer,
            market,
            chain_ttl,
            market_ttl,
        }
    }

    pub fn explorer(&self) -> &ExplorerFetcher {
        &self.explorer
    }

    /// Native balance, formatted at 18 decimals.
    pub async fn balance(&self, ctx: &RequestContext, address: &str) -> ServiceResult<Cached<Value>> {
        let address = canonical_address(address)?;
        let base = ctx.explorer_base()?;
        let key = CacheKey::new(ResourceKind::Balance, ctx.scope(), [address.as_str()]);

        self.cache
            .read_through(&key, self.chain_ttl, || async {
                let result = self.explorer.balance(base, &address).await?;
                normalize_balance(&address, &result)
            })
            .await
    }

    pub async fn address_info(&self, ctx: &RequestContext, address: &str) -> ServiceResult<Cached<Value>> {
        let address = canonical_address(address)?;
        let base = ctx.explorer_base()?;
        let key = CacheKey::new(ResourceKind::AddressInfo, ctx.scope(), [address.as_str()]);

        self.cache
            .read_through(&key, self.chain_ttl, || async {
                let raw = self.explorer.address_info(base, &address).await?;
                normalize_address_info(&raw)
            })
            .await
    }

    pub async fn address_tokens(&self, ctx: &RequestContext, address: &str) -> ServiceResult<Cached<Value>> {
        let address = canonical_address(address)?;
        let base = ctx.explorer_base()?;
        let key = CacheKey::new(ResourceKind::AddressTokens, ctx.scope(), [address.as_str()]);

        self.cache
            .read_through(&key, self.chain_ttl, || async {
                let raw = self.explorer.address_tokens(base, &address).await?;
                normalize_address_tokens(&address, &raw)
            })
            .await
    }

    pub async fn token_balances(&self, ctx: &RequestContext, address: &str) -> ServiceResult<Cached<Value>> {
        let address = canonical_address(address)?;
        let base = ctx.explorer_base()?;
        let key = CacheKey::new(ResourceKind::TokenBalances, ctx.scope(), [address.as_str()]);

        self.cache
            .read_through(&key, self.chain_ttl, || async {
                let result = self.explorer.token_list(base, &address).await?;
                normalize_token_balances(&address, &result)
            })
            .await
    }

    /// One transaction page. Page and limit are part of the key.
    pub async fn transactions(
        &self,
        ctx: &RequestContext,
        address: &str,
        page: u32,
        limit: u32,
    ) -> ServiceResult<Cached<Value>> {
        if page == 0 || limit == 0 {
            return Err(ServiceError::InvalidInput(
                "page and limit must be positive".to_string(),
            ));
        }
        let address = canonical_address(address)?;
        let base = ctx.explorer_base()?;
        let (page_param, limit_param) = (page.to_string(), limit.to_string());
        let key = CacheKey::new(
            ResourceKind::Transactions,
            ctx.scope(),
            [address.as_str(), page_param.as_str(), limit_param.as_str()],
        );

        self.cache
            .read_through(&key, self.chain_ttl, || async {
                let result = self.explorer.transactions(base, &address, page, limit).await?;
                normalize_transactions(&address, page, limit, &result)
            })
            .await
    }

    /// Market snapshot. Not network-scoped.
    pub async fn market_info(&self) -> ServiceResult<Cached<Value>> {
        let key = CacheKey::new(ResourceKind::MarketInfo, GLOBAL_SCOPE, []);

        self.cache
            .read_through(&key, self.market_ttl, || async {
                let raw = self.market.coin().await?;
                normalize_market_info(&raw)
            })
            .await
    }
}
