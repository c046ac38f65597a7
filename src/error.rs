//! Error types for the explorer gateway.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when talking to an upstream HTTP API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status
    #[error("Upstream error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// Request exceeded its timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Connection or transport failure
    #[error("Upstream transport error: {0}")]
    Transport(String),

    /// Body was not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream answered 2xx but reported a failure in its envelope
    #[error("Upstream rejected request: {message}")]
    Rejected { message: String },

    /// Body was JSON but not the expected shape
    #[error("Malformed upstream data: {0}")]
    Malformed(String),
}

/// Errors that can occur during on-chain contract reads.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Contract address failed validation
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    /// The node returned a JSON-RPC error (typically a revert)
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Return data did not decode as the expected type
    #[error("ABI decode error: {0}")]
    Decode(String),

    /// Call exceeded its timeout
    #[error("Contract call timed out")]
    Timeout,

    /// Transport to the RPC endpoint failed
    #[error("RPC transport error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Errors that can occur in the cache store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored payload could not be (de)serialized
    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock was poisoned by a panicking writer
    #[error("Cache store lock poisoned")]
    Poisoned,

    /// The blocking task running a store operation panicked or was cancelled
    #[error("Cache store task failed: {0}")]
    Task(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Request-level failure taxonomy.
///
/// Every handler maps its failure into one of these; the HTTP layer turns
/// each variant into a status code.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A base URL, RPC endpoint or contract address needed by the request is not configured
    #[error("{0} not configured")]
    ConfigurationMissing(String),

    /// Upstream returned non-2xx, timed out or could not be reached
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream data had an unexpected shape
    #[error("Malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    /// Upstream explicitly rejected the request (explorer `status: "0"`)
    #[error("Upstream rejected request: {0}")]
    UpstreamRejected(String),

    /// Missing or invalid request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cache store failure
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConfigurationMissing(_) | Self::Store(_) => 500,
            Self::UpstreamUnavailable(_) | Self::MalformedUpstreamData(_) => 502,
            Self::UpstreamRejected(_) | Self::InvalidInput(_) => 400,
        }
    }
}

impl From<UpstreamError> for ServiceError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { message } => Self::UpstreamRejected(message),
            UpstreamError::Json(e) => Self::MalformedUpstreamData(e.to_string()),
            UpstreamError::Malformed(msg) => Self::MalformedUpstreamData(msg),
            other => Self::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<ChainError> for ServiceError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidAddress(addr) => Self::InvalidInput(format!("invalid address {}", addr)),
            ChainError::Upstream(inner) => inner.into(),
            other => Self::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Convenience type alias for Results with UpstreamError
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Convenience type alias for Results with ChainError
pub type ChainResult<T> = Result<T, ChainError>;

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
