//! Explorer Gateway - Main entry point
//!
//! Loads configuration, wires the cache store and upstream clients, and
//! serves the HTTP API.

use anyhow::Result;
use explorer_gateway::cache::{
    CacheStore, InMemoryCacheStore, ReadThroughCache, SqliteCacheStore, SystemClock,
};
use explorer_gateway::client::{AsyncHttpClient, HttpClient, HttpFetch};
use explorer_gateway::{AppState, Config, Metrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const IN_MEMORY_PATH: &str = ":memory:";

fn open_store(path: &str) -> Result<Arc<dyn CacheStore>> {
    if path == IN_MEMORY_PATH {
        info!("Using in-memory cache store");
        return Ok(Arc::new(InMemoryCacheStore::new()));
    }
    info!("Using SQLite cache store at {}", path);
    Ok(Arc::new(SqliteCacheStore::open(path)?))
}

/// Keep only the latest snapshot per key, every `period`.
fn spawn_compaction(cache: ReadThroughCache, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            match cache.compact().await {
                Ok(removed) => info!(removed, "Cache compaction finished"),
                Err(e) => error!("Cache compaction failed: {}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        network = %config.initial_network,
        "Starting explorer gateway"
    );

    let metrics = Metrics::new();
    let http = Arc::new(AsyncHttpClient::new(HttpClient::new(
        config.request_timeout(),
        metrics.clone(),
    ))) as Arc<dyn HttpFetch>;
    let store = open_store(&config.cache_db_path)?;

    if config.cache_compaction_interval_secs > 0 {
        info!(
            "Cache compaction every {} seconds",
            config.cache_compaction_interval_secs
        );
        spawn_compaction(
            ReadThroughCache::new(store.clone(), Arc::new(SystemClock), metrics.clone()),
            Duration::from_secs(config.cache_compaction_interval_secs),
        );
    }

    let config = Arc::new(config);
    let state = Arc::new(AppState::new(
        config.clone(),
        http,
        store,
        Arc::new(SystemClock),
        metrics,
    ));

    explorer_gateway::server::run_server(&config, state).await?;

    info!("Explorer gateway shutdown complete");
    Ok(())
}
