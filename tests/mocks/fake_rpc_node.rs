use alloy_primitives::U256;
use async_trait::async_trait;
use explorer_gateway::client::{ContractMethod, HttpFetch};
use explorer_gateway::error::{UpstreamError, UpstreamResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake JSON-RPC node answering `eth_call` with canned return data keyed by
/// (contract, calldata).
///
/// Unknown calls revert. Stalled contracts sleep before answering, which
/// under a paused tokio clock lets tests drive the reader's timeout.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FakeRpcNode {
    results: Arc<Mutex<HashMap<(String, String), String>>>,
    stalls: Arc<Mutex<HashMap<String, Duration>>>,
}

#[allow(dead_code)]
impl FakeRpcNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `data` for `method(args)` on `contract`.
    pub fn answer(&self, contract: &str, method: &ContractMethod, args: &[U256], data: String) {
        let key = (contract.to_lowercase(), method.encode_call_hex(args));
        self.results.lock().unwrap().insert(key, data);
    }

    /// Delay every call to `contract` by `delay`.
    pub fn stall(&self, contract: &str, delay: Duration) {
        self.stalls
            .lock()
            .unwrap()
            .insert(contract.to_lowercase(), delay);
    }

    pub fn uint(value: U256) -> String {
        format!("0x{}", hex::encode(value.to_be_bytes::<32>()))
    }

    pub fn address(address: &str) -> String {
        format!("0x{:0>64}", address.trim_start_matches("0x").to_lowercase())
    }

    pub fn string(value: &str) -> String {
        let mut data = U256::from(32u64).to_be_bytes::<32>().to_vec();
        data.extend_from_slice(&U256::from(value.len()).to_be_bytes::<32>());
        let mut bytes = value.as_bytes().to_vec();
        bytes.resize(value.len().div_ceil(32) * 32, 0);
        data.extend(bytes);
        format!("0x{}", hex::encode(data))
    }
}

#[async_trait]
impl HttpFetch for FakeRpcNode {
    async fn get_json(&self, url: &str, _timeout: Duration) -> UpstreamResult<Value> {
        Err(UpstreamError::Status {
            status: 404,
            body: format!("no GET route for {}", url),
        })
    }

    async fn post_json(&self, _url: &str, body: &Value, _timeout: Duration) -> UpstreamResult<Value> {
        let call = &body["params"][0];
        let contract = call["to"].as_str().unwrap_or_default().to_lowercase();
        let data = call["data"].as_str().unwrap_or_default().to_string();

        let stall = self.stalls.lock().unwrap().get(&contract).copied();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }

        let result = self.results.lock().unwrap().get(&(contract, data)).cloned();
        Ok(match result {
            Some(data) => json!({"jsonrpc": "2.0", "id": body["id"], "result": data}),
            None => json!({
                "jsonrpc": "2.0",
                "id": body["id"],
                "error": {"code": 3, "message": "execution reverted"}
            }),
        })
    }
}
