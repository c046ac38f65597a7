//! Cache keys.

use serde::Serialize;
use std::fmt;

/// Maximum number of string parameters in a key.
pub const MAX_KEY_PARAMS: usize = 3;

/// Scope used for resources that do not depend on the network.
pub const GLOBAL_SCOPE: &str = "global";

/// Every cacheable resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Balance,
    AddressInfo,
    AddressTokens,
    TokenBalances,
    Transactions,
    MarketInfo,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::AddressInfo => "address_info",
            Self::AddressTokens => "address_tokens",
            Self::TokenBalances => "token_balances",
            Self::Transactions => "transactions",
            Self::MarketInfo => "market_info",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one cacheable query: resource kind, scope and up to three
/// string parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ResourceKind,
    scope: String,
    params: Vec<String>,
}

impl CacheKey {
    /// Build a key. The parameter count is checked at compile time.
    ///
    /// ```
    /// use explorer_gateway::cache::{CacheKey, ResourceKind};
    ///
    /// let key = CacheKey::new(ResourceKind::Transactions, "mainnet", ["0xabc", "1", "50"]);
    /// assert_eq!(key.params(), ["0xabc", "1", "50"]);
    /// ```
    pub fn new<const N: usize>(kind: ResourceKind, scope: impl Into<String>, params: [&str; N]) -> Self {
        const { assert!(N <= MAX_KEY_PARAMS, "cache keys take at most three parameters") };
        Self {
            kind,
            scope: scope.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter at `index`, or the empty string when absent.
    pub fn param(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.scope)?;
        for param in &self.params {
            write!(f, "/{}", param)?;
        }
        Ok(())
    }
}
