use async_trait::async_trait;
use explorer_gateway::client::HttpFetch;
use explorer_gateway::error::{UpstreamError, UpstreamResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake HTTP capability answering from URL-keyed canned responses.
///
/// Unknown URLs answer 404. Every request is recorded so tests can assert
/// how many upstream calls happened.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FakeHttp {
    responses: Arc<Mutex<HashMap<String, Result<Value, (u16, String)>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GETs to `url` with `body`.
    pub fn respond(&self, url: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body));
    }

    /// Answer GETs to `url` with a non-2xx status.
    pub fn fail(&self, url: &str, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err((status, body.to_string())));
    }

    /// Number of requests made to exactly `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    /// Number of requests made to any URL.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, url: &str) -> UpstreamResult<Value> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.lock().unwrap().get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((status, body))) => Err(UpstreamError::Status {
                status: *status,
                body: body.clone(),
            }),
            None => Err(UpstreamError::Status {
                status: 404,
                body: format!("no canned response for {}", url),
            }),
        }
    }
}

#[async_trait]
impl HttpFetch for FakeHttp {
    async fn get_json(&self, url: &str, _timeout: Duration) -> UpstreamResult<Value> {
        self.answer(url)
    }

    async fn post_json(&self, url: &str, _body: &Value, _timeout: Duration) -> UpstreamResult<Value> {
        self.answer(url)
    }
}
