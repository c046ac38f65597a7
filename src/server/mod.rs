//! HTTP surface for the gateway.
//!
//! A thin axum dispatcher: routes map one-to-one onto service operations and
//! every failure becomes a JSON `{error}` body with the status of its
//! [`ServiceError`](crate::error::ServiceError) variant.

pub mod handlers;

use crate::cache::{CacheStore, Clock, ReadThroughCache};
use crate::client::HttpFetch;
use crate::config::Config;
use crate::domain::NetworkSelector;
use crate::metrics::Metrics;
use crate::services::{
    ChainReaders, ContextFactory, ExplorerFetcher, MarketFetcher, NftInfoAggregator,
    ResourceService,
};
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub contexts: ContextFactory,
    pub resources: ResourceService,
    pub aggregator: NftInfoAggregator,
    pub metrics: Metrics,
}

impl AppState {
    /// Wire services from configuration and the injected capabilities.
    ///
    /// Contract readers are built over `http` for every network with an RPC
    /// URL.
    pub fn new(
        config: Arc<Config>,
        http: Arc<dyn HttpFetch>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        metrics: Metrics,
    ) -> Self {
        let timeout = config.request_timeout();
        let readers = ChainReaders::from_config(&config, http.clone(), &metrics);
        let selector = Arc::new(NetworkSelector::new(config.initial_network));

        let explorer = ExplorerFetcher::new(http.clone(), timeout);
        let market = MarketFetcher::new(
            http,
            config.market_api_url.clone(),
            config.market_coin_id.clone(),
            timeout,
        );
        let cache = ReadThroughCache::new(store, clock, metrics.clone());

        Self {
            resources: ResourceService::new(
                cache,
                explorer.clone(),
                market,
                config.chain_cache_ttl(),
                config.market_cache_ttl(),
            ),
            aggregator: NftInfoAggregator::new(explorer, config.earnings_token_id),
            contexts: ContextFactory::new(config, selector, readers),
            metrics,
        }
    }
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test", get(handlers::test_connection))
        .route(
            "/network",
            get(handlers::get_network).post(handlers::set_network),
        )
        .route("/balance/:address", get(handlers::balance))
        .route("/transactions/:address", get(handlers::transactions))
        .route("/token-balances/:address", get(handlers::token_balances))
        .route("/address/:address", get(handlers::address_info))
        .route("/address/:address/tokens", get(handlers::address_tokens))
        .route("/nft-info", get(handlers::nft_info))
        .route("/nft-earnings/:distributor", get(handlers::nft_earnings))
        .route("/vsg-info", get(handlers::market_info))
        .route("/metrics", get(handlers::metrics))
}

/// CORS for the configured origins. `*` allows any origin; unparseable
/// origins are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(cors_layer(allowed_origins))
}

/// Bind and serve until Ctrl-C.
pub async fn run_server(config: &Config, state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    let app = build_router(state, &config.allowed_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received shutdown signal, stopping server");
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
