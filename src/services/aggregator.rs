//! NFT catalogue grouping and the mainnet cross-source join.

use super::context::RequestContext;
use super::explorer::ExplorerFetcher;
use super::nft::{checksummed, read_distributor, read_nft_contract, read_token_earnings};
use crate::client::ChainReader;
use crate::config::CollectionBinding;
use crate::domain::Network;
use crate::error::{ChainResult, ServiceResult};
use crate::models::{
    CatalogueItem, DistributorDetail, NftContractDetail, NftGroup, NftInfoResponse,
};
use futures::future::join_all;
use std::collections::HashMap;

pub const ENRICHED_MESSAGE: &str = "NFT and Gas Fee Distributor details fetched successfully";
pub const PARTIAL_MESSAGE: &str = "Partial data available - blockchain data fetch failed";

const DEFAULT_IMAGE_URL: &str =
    "https://i.seadn.io/s/raw/files/5efb70d02a93c52c03a99d0de22b39b0.png?auto=format&dpr=1&w=1000";

/// Artwork per collection name.
const IMAGE_URLS: [(&str, &str); 4] = [
    (
        "Carbon NFT",
        "https://purple-abundant-anaconda-910.mypinata.cloud/ipfs/bafybeid66ramqv5zxhozvigq47lhbexkqigrpvtcd44ddiiikig5rte2ey",
    ),
    (
        "Diamond NFT",
        "https://i.seadn.io/s/raw/files/6c809b2b51afde81ec63e5377cb863e7.gif?auto=format&dpr=1&w=1000",
    ),
    (
        "Gold NFT",
        "https://i.seadn.io/s/raw/files/f21efdf06249f173cf359ff5aafcb216.gif?auto=format&dpr=1&w=1000",
    ),
    (
        "Green NFT",
        "https://i.seadn.io/s/raw/files/51523ca6b0d47ec4d80d1cce7b2fcbac.gif?auto=format&dpr=1&w=1000",
    ),
];

/// Image URL for a collection name, with a default for unknown names.
pub fn image_url_for(name: &str) -> &'static str {
    IMAGE_URLS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_IMAGE_URL)
}

/// Group catalogue entries by (name, symbol), summing supply and holders.
///
/// Groups appear in the order their first entry appears.
pub fn group_catalogue(items: &[CatalogueItem]) -> Vec<NftGroup> {
    let mut groups: Vec<NftGroup> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for item in items {
        let name = item.name.clone().unwrap_or_default();
        let symbol = item.symbol.clone().unwrap_or_default();

        let slot = *index
            .entry((name.clone(), symbol.clone()))
            .or_insert_with(|| {
                groups.push(NftGroup {
                    image_url: image_url_for(&name).to_string(),
                    name,
                    symbol,
                    total_supply: 0,
                    holders: 0,
                });
                groups.len() - 1
            });

        let group = &mut groups[slot];
        group.total_supply = group.total_supply.saturating_add(item.total_supply);
        group.holders = group.holders.saturating_add(item.holders);
    }

    groups
}

/// Builds the NFT info response from the catalogue and, on mainnet, on-chain reads.
#[derive(Debug, Clone)]
pub struct NftInfoAggregator {
    explorer: ExplorerFetcher,
    earnings_token_id: u64,
}

impl NftInfoAggregator {
    pub fn new(explorer: ExplorerFetcher, earnings_token_id: u64) -> Self {
        Self {
            explorer,
            earnings_token_id,
        }
    }

    /// Fails only when the catalogue itself cannot be fetched.
    pub async fn aggregate(&self, ctx: &RequestContext) -> ServiceResult<NftInfoResponse> {
        let base = ctx.explorer_base()?;
        let page = self.explorer.nft_catalogue(base).await?;
        let groups = group_catalogue(&page.items);

        if ctx.network != Network::Mainnet {
            return Ok(NftInfoResponse::catalogue_only(groups));
        }

        let reader = match ctx.chain_reader() {
            Ok(reader) => reader.clone(),
            Err(e) => {
                tracing::warn!("Skipping on-chain enrichment: {}", e);
                let mut response = NftInfoResponse::catalogue_only(groups);
                response.message = Some(PARTIAL_MESSAGE.to_string());
                response.error = Some(e.to_string());
                return Ok(response);
            }
        };

        let (nft_details, distributor_details) = futures::join!(
            self.nft_details(reader.as_ref(), &ctx.collections),
            self.distributor_details(reader.as_ref(), &ctx.collections, &groups),
        );

        let mut response = NftInfoResponse::catalogue_only(groups);
        response.message = Some(ENRICHED_MESSAGE.to_string());
        response.nft_details = Some(nft_details);
        response.distributor_details = Some(distributor_details);
        Ok(response)
    }

    async fn nft_details(&self, reader: &dyn ChainReader, bindings: &[CollectionBinding]) -> Vec<NftContractDetail> {
        let reads = bindings.iter().filter_map(|binding| {
            let address = binding.nft_contract.as_deref()?;
            Some(async move {
                match read_nft_contract(reader, address).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::warn!(collection = %binding.collection_name, "NFT contract read failed: {}", e);
                        NftContractDetail::fallback(address, &binding.collection_name, e.to_string())
                    }
                }
            })
        });
        join_all(reads).await
    }

    async fn distributor_details(
        &self,
        reader: &dyn ChainReader,
        bindings: &[CollectionBinding],
        groups: &[NftGroup],
    ) -> Vec<DistributorDetail> {
        let reads = bindings.iter().filter_map(|binding| {
            let address = binding.distributor.as_deref()?;
            Some(async move {
                match self.join_distributor(reader, binding, address, groups).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::warn!(distributor = %binding.distributor_name, "Distributor read failed: {}", e);
                        DistributorDetail::fallback(address, &binding.distributor_name, e.to_string())
                    }
                }
            })
        });
        join_all(reads).await
    }

    async fn join_distributor(
        &self,
        reader: &dyn ChainReader,
        binding: &CollectionBinding,
        raw_address: &str,
        groups: &[NftGroup],
    ) -> ChainResult<DistributorDetail> {
        let address = checksummed(raw_address)?;
        let (state, per_token) = futures::try_join!(
            read_distributor(reader, &address),
            read_token_earnings(reader, &address, self.earnings_token_id),
        )?;

        let total_supply = groups
            .iter()
            .find(|group| group.name == binding.collection_name)
            .map(|group| group.total_supply)
            .unwrap_or(0);
        let total_type_earnings = per_token.parse::<f64>().unwrap_or(0.0) * total_supply as f64;

        Ok(DistributorDetail {
            distributor_address: state.address.to_string(),
            name: binding.distributor_name.clone(),
            linked_nft_contract: Some(state.linked_nft_contract.to_string()),
            total_pool_earnings: state.total_pool_earnings,
            total_distributed: state.total_distributed,
            per_token_earnings: per_token,
            total_type_earnings: total_type_earnings.to_string(),
            error: None,
        })
    }
}
