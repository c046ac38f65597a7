use alloy_primitives::U256;
use async_trait::async_trait;
use explorer_gateway::client::{AbiValue, ChainReader, ContractMethod};
use explorer_gateway::domain::Address;
use explorer_gateway::error::{ChainError, ChainResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Fake contract reader answering from canned values per (contract, method).
///
/// Methods with no canned value revert. Contracts marked as failing revert
/// on every call.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FakeChainReader {
    values: Arc<Mutex<HashMap<(String, &'static str), AbiValue>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl FakeChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned return value for `method` on `contract` (any casing).
    pub fn set(&self, contract: &str, method: &ContractMethod, value: AbiValue) {
        let key = (Self::canonical(contract), method.signature);
        self.values.lock().unwrap().insert(key, value);
    }

    /// Make every call to `contract` revert.
    pub fn fail_contract(&self, contract: &str) {
        self.failing.lock().unwrap().insert(Self::canonical(contract));
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn canonical(contract: &str) -> String {
        Address::parse(contract)
            .map(|a| a.to_string())
            .unwrap_or_else(|_| contract.to_string())
    }
}

#[async_trait]
impl ChainReader for FakeChainReader {
    async fn call(
        &self,
        contract: &Address,
        method: &ContractMethod,
        _args: &[U256],
    ) -> ChainResult<AbiValue> {
        *self.calls.lock().unwrap() += 1;

        if self.failing.lock().unwrap().contains(contract.as_str()) {
            return Err(ChainError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            });
        }

        self.values
            .lock()
            .unwrap()
            .get(&(contract.to_string(), method.signature))
            .cloned()
            .ok_or_else(|| ChainError::Rpc {
                code: 3,
                message: format!("execution reverted: {}", method.signature),
            })
    }
}
