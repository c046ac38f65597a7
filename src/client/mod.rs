//! HTTP and JSON-RPC clients for the upstream APIs.
//!
//! [`HttpClient`] is a synchronous `ureq` client. It is called from async
//! contexts through [`AsyncHttpClient`], which moves each request onto the
//! blocking pool with `tokio::task::spawn_blocking`. Contract reads go through
//! the [`ChainReader`] capability built on top of it.

pub mod abi;
mod async_wrapper;
pub mod rpc;

pub use abi::{AbiType, AbiValue, ContractMethod};
pub use async_wrapper::{AsyncHttpClient, HttpFetch};
pub use rpc::{ChainReader, JsonRpcChainReader};

use crate::error::{UpstreamError, UpstreamResult};
use crate::metrics::{Metrics, UpstreamTimer};
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

/// Longest error body kept in an [`UpstreamError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Synchronous JSON-over-HTTP client.
///
/// Cloning is cheap; clones share the connection pool and metrics.
#[derive(Clone)]
pub struct HttpClient {
    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl HttpClient {
    /// Create a client whose agent gives up after `default_timeout`.
    pub fn new(default_timeout: Duration, metrics: Metrics) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(default_timeout)
            .user_agent(concat!("explorer-gateway/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent: Arc::new(agent),
            metrics,
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// GET `url` and parse the body as JSON.
    pub fn get_json(&self, url: &str, timeout: Duration) -> UpstreamResult<Value> {
        tracing::debug!("GET {}", url);
        let timer = UpstreamTimer::new(self.metrics.clone());

        let result = self
            .agent
            .get(url)
            .timeout(timeout)
            .set("Accept", "application/json")
            .call()
            .map_err(map_error)
            .and_then(read_json);

        finish(timer, url, result)
    }

    /// POST `body` as JSON to `url` and parse the response as JSON.
    pub fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> UpstreamResult<Value> {
        tracing::debug!("POST {}", url);
        let timer = UpstreamTimer::new(self.metrics.clone());

        let result = self
            .agent
            .post(url)
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(map_error)
            .and_then(read_json);

        finish(timer, url, result)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

fn finish(timer: UpstreamTimer, url: &str, result: UpstreamResult<Value>) -> UpstreamResult<Value> {
    match &result {
        Ok(_) => timer.complete(),
        Err(e) => {
            tracing::warn!("Request to {} failed: {}", url, e);
            timer.complete_with_error();
        }
    }
    result
}

fn read_json(response: ureq::Response) -> UpstreamResult<Value> {
    let body = response
        .into_string()
        .map_err(|e| UpstreamError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

/// Map a ureq error to an UpstreamError.
fn map_error(error: ureq::Error) -> UpstreamError {
    match error {
        ureq::Error::Status(status, response) => {
            let mut body = response
                .into_string()
                .unwrap_or_else(|_| "Unknown error".to_string());
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            UpstreamError::Status { status, body }
        }
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                UpstreamError::Timeout
            } else {
                UpstreamError::Transport(transport.to_string())
            }
        }
    }
}

/// Only I/O errors that are read/connect deadlines count as timeouts.
fn is_timeout(transport: &ureq::Transport) -> bool {
    if transport.kind() != ureq::ErrorKind::Io {
        return false;
    }
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .map(|io| matches!(io.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock))
        .unwrap_or(false)
}
