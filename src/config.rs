//! Configuration management for the explorer gateway.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is loaded first if present.

use crate::domain::Network;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Upstream endpoints and contracts for one network.
#[derive(Debug, Clone, Default)]
pub struct NetworkProfile {
    /// Explorer API base URL
    pub explorer_api: Option<String>,

    /// JSON-RPC endpoint
    pub rpc_url: Option<String>,

    /// NFT collections and their gas-fee distributors
    pub collections: Vec<CollectionBinding>,
}

/// Explicit mapping from an NFT collection to its gas-fee distributor.
///
/// The collection name is the join key against the explorer catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBinding {
    /// Collection name as it appears in the explorer catalogue
    pub collection_name: String,

    /// Display name of the distributor
    pub distributor_name: String,

    /// NFT contract address (unchecked; validated at use)
    pub nft_contract: Option<String>,

    /// Distributor contract address (unchecked; validated at use)
    pub distributor: Option<String>,
}

/// Configuration for the explorer gateway.
#[derive(Debug, Clone)]
pub struct Config {
    /// Network selected at startup (default: testnet)
    pub initial_network: Network,

    /// Mainnet endpoints and contracts
    pub mainnet: NetworkProfile,

    /// Testnet endpoints and contracts
    pub testnet: NetworkProfile,

    /// Market-data API base URL
    pub market_api_url: String,

    /// Coin id on the market-data API
    pub market_coin_id: String,

    /// Token id used for per-token distributor earnings (default: 1)
    pub earnings_token_id: u64,

    /// Upstream request timeout in milliseconds (default: 5000)
    pub request_timeout_ms: u64,

    /// TTL for chain-derived resources in seconds (default: 300)
    pub chain_cache_ttl_secs: u64,

    /// TTL for market data in seconds (default: 60)
    pub market_cache_ttl_secs: u64,

    /// SQLite path, or `:memory:` for the in-process store
    pub cache_db_path: String,

    /// Keep-latest-per-key compaction period in seconds, 0 disables
    pub cache_compaction_interval_secs: u64,

    /// Bind host
    pub host: String,

    /// Bind port (default: 3002)
    pub port: u16,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

const DEFAULT_MARKET_API_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_MARKET_COIN_ID: &str = "vitalik-smart-gas";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// (collection, distributor display name, NFT env var, distributor env var)
const MAINNET_COLLECTIONS: [(&str, &str, &str, &str); 4] = [
    ("Diamond NFT", "Diamond NFT Distributor", "DIAMOND_NFT", "GAS_DISTRIBUTOR_DIAMOND"),
    ("Carbon NFT", "Carbon NFT Distributor", "CARBON_NFT", "GAS_DISTRIBUTOR_CARBON"),
    ("Green NFT", "Green NFT Distributor", "GREEN_NFT", "GAS_DISTRIBUTOR_GREEN"),
    ("Gold NFT", "Gold NFT Distributor", "GOLD_NFT", "GAS_DISTRIBUTOR_GOLD"),
];

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Endpoint variables are optional here; a request that needs a missing
    /// endpoint fails with a configuration error at that point.
    ///
    /// - `NETWORK`: `mainnet` or `testnet` (default: testnet)
    /// - `VSC_MAINNET_API`, `VSC_TESTNET_API`: explorer base URLs
    /// - `VSC_RPC_MAINNET_API`, `VSC_RPC_TESTNET_API`: JSON-RPC endpoints
    /// - `MARKET_API_URL`, `MARKET_COIN_ID`: market-data source
    /// - `DIAMOND_NFT`, `CARBON_NFT`, `GREEN_NFT`, `GOLD_NFT`: mainnet NFT contracts
    /// - `GAS_DISTRIBUTOR_DIAMOND`, `..._CARBON`, `..._GREEN`, `..._GOLD`: mainnet distributors
    /// - `EARNINGS_TOKEN_ID`: token id for per-token earnings (default: 1)
    /// - `REQUEST_TIMEOUT_MS`: upstream timeout (default: 5000)
    /// - `CHAIN_CACHE_TTL_SECS` (default: 300), `MARKET_CACHE_TTL_SECS` (default: 60)
    /// - `CACHE_DB_PATH` (default: db.sqlite), `CACHE_COMPACTION_INTERVAL_SECS` (default: 0)
    /// - `HOST` (default: 127.0.0.1), `PORT` (default: 3002), `ALLOWED_ORIGINS`
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let initial_network = match env::var("NETWORK") {
            Ok(value) => value.parse::<Network>().map_err(|_| ConfigError::InvalidValue {
                var: "NETWORK".to_string(),
                reason: format!("Must be 'mainnet' or 'testnet', got: {}", value),
            })?,
            Err(_) => Network::Testnet,
        };

        let mainnet = NetworkProfile {
            explorer_api: Self::parse_env_url("VSC_MAINNET_API")?,
            rpc_url: Self::parse_env_url("VSC_RPC_MAINNET_API")?,
            collections: MAINNET_COLLECTIONS
                .iter()
                .map(|(collection, distributor, nft_var, dist_var)| CollectionBinding {
                    collection_name: collection.to_string(),
                    distributor_name: distributor.to_string(),
                    nft_contract: Self::env_non_empty(nft_var),
                    distributor: Self::env_non_empty(dist_var),
                })
                .collect(),
        };

        let testnet = NetworkProfile {
            explorer_api: Self::parse_env_url("VSC_TESTNET_API")?,
            rpc_url: Self::parse_env_url("VSC_RPC_TESTNET_API")?,
            collections: Vec::new(),
        };

        let market_api_url = Self::parse_env_url("MARKET_API_URL")?
            .unwrap_or_else(|| DEFAULT_MARKET_API_URL.to_string());
        let market_coin_id =
            env::var("MARKET_COIN_ID").unwrap_or_else(|_| DEFAULT_MARKET_COIN_ID.to_string());

        let earnings_token_id = Self::parse_env_u64("EARNINGS_TOKEN_ID", 1)?;
        let request_timeout_ms = Self::parse_env_u64("REQUEST_TIMEOUT_MS", 5000)?;
        let chain_cache_ttl_secs = Self::parse_env_u64("CHAIN_CACHE_TTL_SECS", 300)?;
        let market_cache_ttl_secs = Self::parse_env_u64("MARKET_CACHE_TTL_SECS", 60)?;
        let cache_compaction_interval_secs =
            Self::parse_env_u64("CACHE_COMPACTION_INTERVAL_SECS", 0)?;

        if request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let cache_db_path = env::var("CACHE_DB_PATH").unwrap_or_else(|_| "db.sqlite".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = Self::parse_env_u16("PORT", 3002)?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            initial_network,
            mainnet,
            testnet,
            market_api_url,
            market_coin_id,
            earnings_token_id,
            request_timeout_ms,
            chain_cache_ttl_secs,
            market_cache_ttl_secs,
            cache_db_path,
            cache_compaction_interval_secs,
            host,
            port,
            allowed_origins,
        })
    }

    /// Endpoints and contracts for `network`.
    pub fn profile(&self, network: Network) -> &NetworkProfile {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn chain_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.chain_cache_ttl_secs)
    }

    pub fn market_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.market_cache_ttl_secs)
    }

    /// Read a variable, treating empty values as unset.
    fn env_non_empty(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Read an optional URL variable, validating its scheme.
    fn parse_env_url(var_name: &str) -> ConfigResult<Option<String>> {
        match Self::env_non_empty(var_name) {
            Some(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidValue {
                        var: var_name.to_string(),
                        reason: "Must start with http:// or https://".to_string(),
                    });
                }
                Ok(Some(url.trim_end_matches('/').to_string()))
            }
            None => Ok(None),
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u16 with a default value.
    fn parse_env_u16(var_name: &str, default: u16) -> ConfigResult<u16> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a port number between 0-65535, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_network: Network::Testnet,
            mainnet: NetworkProfile::default(),
            testnet: NetworkProfile::default(),
            market_api_url: DEFAULT_MARKET_API_URL.to_string(),
            market_coin_id: DEFAULT_MARKET_COIN_ID.to_string(),
            earnings_token_id: 1,
            request_timeout_ms: 5000,
            chain_cache_ttl_secs: 300,
            market_cache_ttl_secs: 60,
            cache_db_path: ":memory:".to_string(),
            cache_compaction_interval_secs: 0,
            host: "127.0.0.1".to_string(),
            port: 3002,
            allowed_origins: Vec::new(),
        }
    }
}
