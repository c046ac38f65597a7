//! Explorer `module/action` response envelope.

use crate::error::{UpstreamError, UpstreamResult};
use serde::Deserialize;
use serde_json::Value;

/// Messages that accompany `status: "0"` when the list is merely empty.
const EMPTY_RESULT_MESSAGES: [&str; 2] = ["No transactions found", "No tokens found"];

/// `{status, message, result}` wrapper used by the `/api?module=...` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEnvelope {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub result: Value,
}

impl ExplorerEnvelope {
    pub fn from_value(value: Value) -> UpstreamResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The `result`, or a rejection when `status` is `"0"`.
    ///
    /// An empty-list rejection resolves to an empty array instead.
    pub fn into_result(self) -> UpstreamResult<Value> {
        if self.status.as_deref() != Some("0") {
            return Ok(self.result);
        }

        let message = self.message.unwrap_or_else(|| "Unknown error".to_string());
        if EMPTY_RESULT_MESSAGES.iter().any(|m| message.starts_with(m)) {
            return Ok(Value::Array(Vec::new()));
        }
        Err(UpstreamError::Rejected { message })
    }
}
