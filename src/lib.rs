//! Explorer Gateway - a read-through cache and aggregation layer in front of a
//! blockchain explorer HTTP API, an on-chain JSON-RPC endpoint and a
//! market-data API.
//!
//! # Architecture
//!
//! - **domain**: Checksummed addresses, the network selector, base-unit formatting
//! - **error**: Error enums per concern and the request-level taxonomy
//! - **config**: Configuration management from environment variables
//! - **client**: `ureq` HTTP client, async wrapper, ABI codec and JSON-RPC contract reader
//! - **cache**: Cache keys, stores (in-memory and SQLite), freshness and read-through
//! - **normalize**: Declarative upstream-to-output transforms
//! - **models**: Explorer envelope and NFT aggregation types
//! - **services**: Request context, fetchers, cached resources and the NFT aggregator
//! - **server**: axum routes and handlers
//! - **metrics**: Atomic counters for upstream, cache and chain activity

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use cache::{CacheKey, CacheStore, InMemoryCacheStore, ReadThroughCache, SqliteCacheStore};
pub use client::{AsyncHttpClient, ChainReader, HttpClient, HttpFetch, JsonRpcChainReader};
pub use config::Config;
pub use domain::{Address, Network, NetworkSelector};
pub use error::{ChainError, ConfigError, ServiceError, StoreError, UpstreamError};
pub use metrics::{Metrics, MetricsSummary, UpstreamTimer};
pub use server::{build_router, AppState};
pub use services::{NftInfoAggregator, RequestContext, ResourceService};
