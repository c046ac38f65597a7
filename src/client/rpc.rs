//! Contract reads over JSON-RPC `eth_call`.

use super::abi::{decode_hex, AbiValue, ContractMethod};
use super::async_wrapper::HttpFetch;
use crate::domain::Address;
use crate::error::{ChainError, ChainResult, UpstreamError};
use crate::metrics::Metrics;
use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Read-only contract call capability.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Call a view `method` on `contract` with `uint256` arguments.
    async fn call(
        &self,
        contract: &Address,
        method: &ContractMethod,
        args: &[U256],
    ) -> ChainResult<AbiValue>;
}

/// [`ChainReader`] issuing `eth_call` against a JSON-RPC endpoint.
pub struct JsonRpcChainReader {
    http: Arc<dyn HttpFetch>,
    rpc_url: String,
    timeout: Duration,
    metrics: Metrics,
    next_id: AtomicU64,
}

impl JsonRpcChainReader {
    pub fn new(http: Arc<dyn HttpFetch>, rpc_url: impl Into<String>, timeout: Duration, metrics: Metrics) -> Self {
        Self {
            http,
            rpc_url: rpc_url.into(),
            timeout,
            metrics,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn eth_call(&self, contract: &Address, data: String) -> ChainResult<String> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": contract.as_str(), "data": data }, "latest"],
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let response = tokio::time::timeout(
            self.timeout,
            self.http.post_json(&self.rpc_url, &payload, self.timeout),
        )
        .await
        .map_err(|_| ChainError::Timeout)??;

        parse_rpc_response(response)
    }
}

impl std::fmt::Debug for JsonRpcChainReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcChainReader")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn parse_rpc_response(response: Value) -> ChainResult<String> {
    if let Some(error) = response.get("error") {
        return Err(ChainError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string(),
        });
    }

    response
        .get("result")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ChainError::Upstream(UpstreamError::Malformed(
                "JSON-RPC response has no result".to_string(),
            ))
        })
}

#[async_trait]
impl ChainReader for JsonRpcChainReader {
    async fn call(
        &self,
        contract: &Address,
        method: &ContractMethod,
        args: &[U256],
    ) -> ChainResult<AbiValue> {
        tracing::debug!(contract = %contract, method = method.signature, "eth_call");

        let result = match self.eth_call(contract, method.encode_call_hex(args)).await {
            Ok(raw) => decode_hex(method.output, &raw),
            Err(e) => Err(e),
        };

        self.metrics.record_chain_call(result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(contract = %contract, method = method.signature, "Contract call failed: {}", e);
        }
        result
    }
}
