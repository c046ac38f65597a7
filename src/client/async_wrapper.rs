//! Async wrapper around the synchronous [`HttpClient`].
//!
//! Requests run on tokio's blocking pool so a slow upstream never stalls the
//! async runtime.

use crate::client::HttpClient;
use crate::error::{UpstreamError, UpstreamResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// JSON-over-HTTP capability used by every upstream fetcher.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str, timeout: Duration) -> UpstreamResult<Value>;

    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> UpstreamResult<Value>;
}

/// [`HttpFetch`] backed by `ureq` on the blocking pool.
#[derive(Clone, Debug)]
pub struct AsyncHttpClient {
    client: Arc<HttpClient>,
}

impl AsyncHttpClient {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl HttpFetch for AsyncHttpClient {
    async fn get_json(&self, url: &str, timeout: Duration) -> UpstreamResult<Value> {
        let client = self.client.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || client.get_json(&url, timeout))
            .await
            .map_err(|e| UpstreamError::Transport(format!("Task join error: {}", e)))?
    }

    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> UpstreamResult<Value> {
        let client = self.client.clone();
        let url = url.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.post_json(&url, &body, timeout))
            .await
            .map_err(|e| UpstreamError::Transport(format!("Task join error: {}", e)))?
    }
}
