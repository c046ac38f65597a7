//! NFT catalogue entries and the aggregated NFT/distributor response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize a count that may arrive as a number, a numeric string or
/// anything else. Anything that does not parse counts as 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

/// One ERC-721 collection from the explorer's `/v2/tokens` catalogue.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CatalogueItem {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,

    /// Minted supply (API field: total_supply)
    #[serde(deserialize_with = "lenient_count")]
    pub total_supply: u64,

    /// Holder count (API field: holders, newer explorers: holders_count)
    #[serde(deserialize_with = "lenient_count", alias = "holders_count")]
    pub holders: u64,
}

/// Deserialize a list that may be absent or `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A page of the catalogue.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CataloguePage {
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<CatalogueItem>,
}

/// Catalogue entries sharing (name, symbol), summed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftGroup {
    pub name: String,
    pub symbol: String,
    pub total_supply: u64,
    pub holders: u64,
    pub image_url: String,
}

/// On-chain details of one NFT contract.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftContractDetail {
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NftContractDetail {
    /// Record emitted when any read for the contract failed.
    pub fn fallback(contract_address: &str, name: &str, error: String) -> Self {
        Self {
            contract_address: contract_address.to_string(),
            name: name.to_string(),
            symbol: "ERROR".to_string(),
            total_supply: "0".to_string(),
            error: Some(error),
        }
    }
}

/// On-chain state of one gas-fee distributor, joined with its collection.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributorDetail {
    pub distributor_address: String,
    pub name: String,
    pub linked_nft_contract: Option<String>,
    pub total_pool_earnings: String,
    pub total_distributed: String,
    pub per_token_earnings: String,
    pub total_type_earnings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DistributorDetail {
    /// Zeroed record with no linked contract, emitted when building the item failed.
    pub fn fallback(distributor_address: &str, name: &str, error: String) -> Self {
        Self {
            distributor_address: distributor_address.to_string(),
            name: name.to_string(),
            linked_nft_contract: None,
            total_pool_earnings: "0".to_string(),
            total_distributed: "0".to_string(),
            per_token_earnings: "0".to_string(),
            total_type_earnings: "0".to_string(),
            error: Some(error),
        }
    }
}

/// Response of the NFT aggregation endpoint.
///
/// Testnet responses carry only `totalNftTypes` and `data`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftInfoResponse {
    pub total_nft_types: usize,
    pub data: Vec<NftGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_details: Option<Vec<NftContractDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_details: Option<Vec<DistributorDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NftInfoResponse {
    pub fn catalogue_only(data: Vec<NftGroup>) -> Self {
        Self {
            total_nft_types: data.len(),
            data,
            message: None,
            nft_details: None,
            distributor_details: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
    Success,
    Error,
}

/// Earnings of one token id at a distributor.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftEarning {
    pub nft_id: u64,
    pub current_earnings: String,
    pub total_withdrawn: String,
    pub status: EarningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftEarningsResponse {
    pub distributor_address: String,
    pub nft_earnings: Vec<NftEarning>,
}
