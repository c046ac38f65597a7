//! Network selection.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// The chain network every upstream call is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Mainnet => 0,
            Self::Testnet => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        if value == 0 {
            Self::Mainnet
        } else {
            Self::Testnet
        }
    }
}

impl FromStr for Network {
    type Err = ValidationError;

    /// Only the exact literals `mainnet` and `testnet` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(ValidationError::InvalidValue(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide network selector.
///
/// A single atomic value: a switch is visible to every request that starts
/// after it, and requests read it exactly once when capturing their context.
#[derive(Debug)]
pub struct NetworkSelector {
    current: AtomicU8,
}

impl NetworkSelector {
    pub fn new(initial: Network) -> Self {
        Self {
            current: AtomicU8::new(initial.to_u8()),
        }
    }

    /// Get the currently selected network.
    pub fn get(&self) -> Network {
        Network::from_u8(self.current.load(Ordering::SeqCst))
    }

    /// Switch networks, last writer wins.
    pub fn set(&self, network: Network) -> Network {
        self.current.store(network.to_u8(), Ordering::SeqCst);
        tracing::info!(network = %network, "Network switched");
        network
    }

    /// Parse and switch in one step.
    pub fn set_str(&self, value: &str) -> Result<Network, ValidationError> {
        let network = value.parse::<Network>()?;
        Ok(self.set(network))
    }
}
