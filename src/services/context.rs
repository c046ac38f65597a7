//! Request-scoped view of the selected network.

use crate::client::{ChainReader, HttpFetch, JsonRpcChainReader};
use crate::config::{CollectionBinding, Config};
use crate::domain::{Network, NetworkSelector};
use crate::error::{ServiceError, ServiceResult};
use crate::metrics::Metrics;
use std::sync::Arc;

/// Everything a request needs to know about its network, captured once at
/// request entry. A network switch during the request does not affect it.
#[derive(Clone)]
pub struct RequestContext {
    pub network: Network,
    pub explorer_api: Option<String>,
    pub collections: Vec<CollectionBinding>,
    pub chain: Option<Arc<dyn ChainReader>>,
}

impl RequestContext {
    /// Explorer base URL, or a configuration error.
    pub fn explorer_base(&self) -> ServiceResult<&str> {
        self.explorer_api
            .as_deref()
            .ok_or_else(|| ServiceError::ConfigurationMissing("API URL".to_string()))
    }

    /// Contract reader, or a configuration error when no RPC URL is set.
    pub fn chain_reader(&self) -> ServiceResult<&Arc<dyn ChainReader>> {
        self.chain
            .as_ref()
            .ok_or_else(|| ServiceError::ConfigurationMissing(format!("{} RPC URL", self.network)))
    }

    /// Cache key scope for chain-derived resources.
    pub fn scope(&self) -> &'static str {
        self.network.as_str()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("network", &self.network)
            .field("explorer_api", &self.explorer_api)
            .field("collections", &self.collections.len())
            .field("chain", &self.chain.is_some())
            .finish()
    }
}

/// One contract reader per network that has an RPC URL.
#[derive(Clone, Default)]
pub struct ChainReaders {
    pub mainnet: Option<Arc<dyn ChainReader>>,
    pub testnet: Option<Arc<dyn ChainReader>>,
}

impl ChainReaders {
    /// Build JSON-RPC readers for every network with a configured RPC URL.
    pub fn from_config(config: &Config, http: Arc<dyn HttpFetch>, metrics: &Metrics) -> Self {
        let reader = |network: Network| -> Option<Arc<dyn ChainReader>> {
            config.profile(network).rpc_url.as_ref().map(|url| {
                Arc::new(JsonRpcChainReader::new(
                    http.clone(),
                    url.clone(),
                    config.request_timeout(),
                    metrics.clone(),
                )) as Arc<dyn ChainReader>
            })
        };

        Self {
            mainnet: reader(Network::Mainnet),
            testnet: reader(Network::Testnet),
        }
    }

    pub fn get(&self, network: Network) -> Option<Arc<dyn ChainReader>> {
        match network {
            Network::Mainnet => self.mainnet.clone(),
            Network::Testnet => self.testnet.clone(),
        }
    }
}

/// Captures a [`RequestContext`] from the shared network selector.
#[derive(Clone)]
pub struct ContextFactory {
    config: Arc<Config>,
    selector: Arc<NetworkSelector>,
    readers: ChainReaders,
}

impl ContextFactory {
    pub fn new(config: Arc<Config>, selector: Arc<NetworkSelector>, readers: ChainReaders) -> Self {
        Self {
            config,
            selector,
            readers,
        }
    }

    pub fn selector(&self) -> &Arc<NetworkSelector> {
        &self.selector
    }

    /// Snapshot the current network and everything derived from it.
    pub fn capture(&self) -> RequestContext {
        self.for_network(self.selector.get())
    }

    pub fn for_network(&self, network: Network) -> RequestContext {
        let profile = self.config.profile(network);
        RequestContext {
            network,
            explorer_api: profile.explorer_api.clone(),
            collections: profile.collections.clone(),
            chain: self.readers.get(network),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkProfile;

    fn factory() -> ContextFactory {
        let config = Config {
            mainnet: NetworkProfile {
                explorer_api: Some("https://main.example".to_string()),
                ..Default::default()
            },
            testnet: NetworkProfile {
                explorer_api: Some("https://test.example".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        ContextFactory::new(
            Arc::new(config),
            Arc::new(NetworkSelector::new(Network::Testnet)),
            ChainReaders::default(),
        )
    }

    #[test]
    fn test_captured_context_survives_switch() {
        let factory = factory();
        let captured = factory.capture();

        factory.selector().set(Network::Mainnet);
        let after = factory.capture();

        assert_eq!(captured.network, Network::Testnet);
        assert_eq!(captured.explorer_base().unwrap(), "https://test.example");
        assert_eq!(after.network, Network::Mainnet);
        assert_eq!(after.explorer_base().unwrap(), "https://main.example");
    }

    #[test]
    fn test_missing_configuration() {
        let factory = ContextFactory::new(
            Arc::new(Config::default()),
            Arc::new(NetworkSelector::new(Network::Mainnet)),
            ChainReaders::default(),
        );
        let ctx = factory.capture();

        let err = ctx.explorer_base().unwrap_err();
        assert_eq!(err.to_string(), "API URL not configured");
        assert_eq!(err.status_code(), 500);
        assert!(matches!(ctx.chain_reader(), Err(ServiceError::ConfigurationMissing(_))));
    }
}
