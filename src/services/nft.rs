//! On-chain reads for NFT contracts and gas-fee distributors.

use crate::client::abi::{
    CALCULATE_USER_EARNINGS, NAME, NFT_CONTRACT, SYMBOL, TOTAL_DISTRIBUTED, TOTAL_SUPPLY,
    USER_WITHDRAWN_PER_NFT_ID, VIEW_TOTAL_EARNINGS,
};
use crate::client::{AbiValue, ChainReader};
use crate::domain::{format_ether, Address};
use crate::error::{ChainError, ChainResult};
use crate::models::{EarningStatus, NftContractDetail, NftEarning, NftEarningsResponse};
use alloy_primitives::U256;
use futures::future::join_all;

/// Parse a configured contract address into its checksummed form.
pub fn checksummed(raw: &str) -> ChainResult<Address> {
    Address::parse(raw).map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

/// `name()`, `symbol()` and `totalSupply()` of one NFT contract.
pub async fn read_nft_contract(reader: &dyn ChainReader, raw_address: &str) -> ChainResult<NftContractDetail> {
    let address = checksummed(raw_address)?;

    let (name, symbol, supply) = futures::try_join!(
        reader.call(&address, &NAME, &[]),
        reader.call(&address, &SYMBOL, &[]),
        reader.call(&address, &TOTAL_SUPPLY, &[]),
    )?;

    Ok(NftContractDetail {
        contract_address: address.to_string(),
        name: name.as_string()?.to_string(),
        symbol: symbol.as_string()?.to_string(),
        total_supply: supply.as_uint()?.to_string(),
        error: None,
    })
}

/// Distributor state: linked NFT contract and pool totals in native units.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorState {
    pub address: Address,
    pub linked_nft_contract: Address,
    pub total_pool_earnings: String,
    pub total_distributed: String,
}

pub async fn read_distributor(reader: &dyn ChainReader, address: &Address) -> ChainResult<DistributorState> {
    let (linked, earnings, distributed) = futures::try_join!(
        reader.call(address, &NFT_CONTRACT, &[]),
        reader.call(address, &VIEW_TOTAL_EARNINGS, &[]),
        reader.call(address, &TOTAL_DISTRIBUTED, &[]),
    )?;

    Ok(DistributorState {
        address: address.clone(),
        linked_nft_contract: linked.as_address()?.clone(),
        total_pool_earnings: ether(&earnings)?,
        total_distributed: ether(&distributed)?,
    })
}

/// Current unclaimed earnings of `token_id`, in native units.
pub async fn read_token_earnings(reader: &dyn ChainReader, distributor: &Address, token_id: u64) -> ChainResult<String> {
    let args = [U256::from(token_id)];
    let earnings = reader
        .call(distributor, &CALCULATE_USER_EARNINGS, &args)
        .await?;
    ether(&earnings)
}

/// A uint return value rendered in native units.
fn ether(value: &AbiValue) -> ChainResult<String> {
    Ok(format_ether(value.as_uint()?))
}

async fn earning_pair(reader: &dyn ChainReader, distributor: &Address, nft_id: u64) -> ChainResult<(String, String)> {
    let args = [U256::from(nft_id)];
    let (current, withdrawn) = futures::try_join!(
        reader.call(distributor, &CALCULATE_USER_EARNINGS, &args),
        reader.call(distributor, &USER_WITHDRAWN_PER_NFT_ID, &args),
    )?;
    Ok((ether(&current)?, ether(&withdrawn)?))
}

async fn read_earning(reader: &dyn ChainReader, distributor: &Address, nft_id: u64) -> NftEarning {
    match earning_pair(reader, distributor, nft_id).await {
        Ok((current_earnings, total_withdrawn)) => NftEarning {
            nft_id,
            current_earnings,
            total_withdrawn,
            status: EarningStatus::Success,
            error: None,
        },
        Err(e) => {
            tracing::warn!(distributor = %distributor, nft_id, "Earnings read failed: {}", e);
            NftEarning {
                nft_id,
                current_earnings: "0".to_string(),
                total_withdrawn: "0".to_string(),
                status: EarningStatus::Error,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Per-token earnings and withdrawals at one distributor.
///
/// Each id is read independently; a failed id is reported in place.
pub async fn fetch_nft_earnings(reader: &dyn ChainReader, distributor: &Address, nft_ids: &[u64]) -> NftEarningsResponse {
    let nft_earnings = join_all(
        nft_ids
            .iter()
            .map(|id| read_earning(reader, distributor, *id)),
    )
    .await;

    NftEarningsResponse {
        distributor_address: distributor.to_string(),
        nft_earnings,
    }
}
