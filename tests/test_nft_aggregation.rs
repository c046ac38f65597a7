//! NFT catalogue grouping and the mainnet cross-source join.

mod mocks;

use explorer_gateway::client::abi::{
    CALCULATE_USER_EARNINGS, NAME, NFT_CONTRACT, SYMBOL, TOTAL_DISTRIBUTED, TOTAL_SUPPLY,
    USER_WITHDRAWN_PER_NFT_ID, VIEW_TOTAL_EARNINGS,
};
use alloy_primitives::U256;
use explorer_gateway::client::{AbiValue, ChainReader};
use explorer_gateway::config::CollectionBinding;
use explorer_gateway::domain::{Address, Network};
use explorer_gateway::error::ServiceError;
use explorer_gateway::models::EarningStatus;
use explorer_gateway::services::{fetch_nft_earnings, ExplorerFetcher, NftInfoAggregator, RequestContext};
use mocks::{FakeChainReader, FakeHttp};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const BASE: &str = "https://mainnet.example";
const ONE_AND_HALF: u128 = 1_500_000_000_000_000_000;

/// (collection, distributor name, nft contract, distributor contract)
const COLLECTIONS: [(&str, &str, &str, &str); 4] = [
    (
        "Diamond NFT",
        "Diamond NFT Distributor",
        "0x1111111111111111111111111111111111111111",
        "0x5555555555555555555555555555555555555555",
    ),
    (
        "Carbon NFT",
        "Carbon NFT Distributor",
        "0x2222222222222222222222222222222222222222",
        "0x6666666666666666666666666666666666666666",
    ),
    (
        "Green NFT",
        "Green NFT Distributor",
        "0x3333333333333333333333333333333333333333",
        "0x7777777777777777777777777777777777777777",
    ),
    (
        "Gold NFT",
        "Gold NFT Distributor",
        "0x4444444444444444444444444444444444444444",
        "0x8888888888888888888888888888888888888888",
    ),
];

fn catalogue_url() -> String {
    format!("{}/v2/tokens?type=ERC-721", BASE)
}

fn catalogue() -> serde_json::Value {
    json!({
        "items": [
            {"address": COLLECTIONS[0].2, "name": "Diamond NFT", "symbol": "DMD", "total_supply": "100", "holders": "10"},
            {"address": COLLECTIONS[1].2, "name": "Carbon NFT", "symbol": "CRB", "total_supply": "40", "holders": "4"},
            {"address": COLLECTIONS[0].2, "name": "Diamond NFT", "symbol": "DMD", "total_supply": "50", "holders_count": "5"},
            {"address": COLLECTIONS[2].2, "name": "Green NFT", "symbol": "GRN", "total_supply": null, "holders": "abc"},
            {"address": COLLECTIONS[3].2, "name": "Gold NFT", "symbol": "GLD", "total_supply": 7, "holders": 2}
        ]
    })
}

fn bindings() -> Vec<CollectionBinding> {
    COLLECTIONS
        .iter()
        .map(|(collection, distributor, nft, dist)| CollectionBinding {
            collection_name: collection.to_string(),
            distributor_name: distributor.to_string(),
            nft_contract: Some(nft.to_string()),
            distributor: Some(dist.to_string()),
        })
        .collect()
}

/// A reader where every configured contract answers.
fn healthy_reader() -> FakeChainReader {
    let reader = FakeChainReader::new();
    for (collection, _, nft, dist) in COLLECTIONS {
        reader.set(nft, &NAME, AbiValue::String(collection.to_string()));
        reader.set(nft, &SYMBOL, AbiValue::String("SYM".to_string()));
        reader.set(nft, &TOTAL_SUPPLY, AbiValue::Uint(U256::from(150u64)));

        let linked = Address::parse(nft).unwrap();
        reader.set(dist, &NFT_CONTRACT, AbiValue::Address(linked));
        reader.set(dist, &VIEW_TOTAL_EARNINGS, AbiValue::Uint(U256::from(10 * ONE_AND_HALF)));
        reader.set(dist, &TOTAL_DISTRIBUTED, AbiValue::Uint(U256::from(ONE_AND_HALF)));
        reader.set(dist, &CALCULATE_USER_EARNINGS, AbiValue::Uint(U256::from(ONE_AND_HALF)));
        reader.set(dist, &USER_WITHDRAWN_PER_NFT_ID, AbiValue::Uint(U256::ZERO));
    }
    reader
}

fn aggregator(http: &FakeHttp) -> NftInfoAggregator {
    NftInfoAggregator::new(
        ExplorerFetcher::new(Arc::new(http.clone()), Duration::from_secs(5)),
        1,
    )
}

fn mainnet_context(reader: Option<FakeChainReader>) -> RequestContext {
    RequestContext {
        network: Network::Mainnet,
        explorer_api: Some(BASE.to_string()),
        collections: bindings(),
        chain: reader.map(|r| Arc::new(r) as Arc<dyn ChainReader>),
    }
}

#[tokio::test]
async fn test_catalogue_is_grouped_in_first_appearance_order() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());
    let ctx = RequestContext {
        network: Network::Testnet,
        ..mainnet_context(None)
    };

    let response = aggregator(&http).aggregate(&ctx).await.unwrap();

    assert_eq!(response.total_nft_types, 4);
    let names: Vec<_> = response.data.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Diamond NFT", "Carbon NFT", "Green NFT", "Gold NFT"]);

    let diamond = &response.data[0];
    assert_eq!(diamond.total_supply, 150);
    assert_eq!(diamond.holders, 15);

    let green = &response.data[2];
    assert_eq!(green.total_supply, 0);
    assert_eq!(green.holders, 0);

    // Testnet carries only the catalogue.
    let body = serde_json::to_value(&response).unwrap();
    assert!(body.get("message").is_none());
    assert!(body.get("nftDetails").is_none());
    assert!(body.get("distributorDetails").is_none());
}

#[tokio::test]
async fn test_mainnet_join_with_one_failing_distributor() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());
    let reader = healthy_reader();
    reader.fail_contract(COLLECTIONS[3].3);

    let response = aggregator(&http)
        .aggregate(&mainnet_context(Some(reader)))
        .await
        .unwrap();

    assert_eq!(
        response.message.as_deref(),
        Some("NFT and Gas Fee Distributor details fetched successfully")
    );

    let nft_details = response.nft_details.as_ref().unwrap();
    assert_eq!(nft_details.len(), 4);
    assert!(nft_details.iter().all(|d| d.error.is_none()));

    let distributors = response.distributor_details.as_ref().unwrap();
    assert_eq!(distributors.len(), 4);

    let failed: Vec<_> = distributors.iter().filter(|d| d.error.is_some()).collect();
    assert_eq!(failed.len(), 1);
    let gold = failed[0];
    assert_eq!(gold.name, "Gold NFT Distributor");
    assert_eq!(gold.linked_nft_contract, None);
    assert_eq!(gold.total_pool_earnings, "0");
    assert_eq!(gold.total_distributed, "0");
    assert_eq!(gold.per_token_earnings, "0");
    assert_eq!(gold.total_type_earnings, "0");

    let diamond = &distributors[0];
    assert_eq!(diamond.error, None);
    assert_eq!(diamond.linked_nft_contract.as_deref(), Some(COLLECTIONS[0].2));
    assert_eq!(diamond.total_pool_earnings, "15.0");
    assert_eq!(diamond.total_distributed, "1.5");
    assert_eq!(diamond.per_token_earnings, "1.5");
    // 1.5 per token over the grouped supply of 150.
    assert_eq!(diamond.total_type_earnings, "225");

    let carbon = &distributors[1];
    assert_eq!(carbon.total_type_earnings, "60");
}

#[tokio::test]
async fn test_pool_beyond_128_bits_is_formatted_exactly() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());
    let reader = healthy_reader();
    reader.set(
        COLLECTIONS[0].3,
        &VIEW_TOTAL_EARNINGS,
        AbiValue::Uint(U256::from(1u64) << 128),
    );

    let response = aggregator(&http)
        .aggregate(&mainnet_context(Some(reader)))
        .await
        .unwrap();

    let diamond = &response.distributor_details.unwrap()[0];
    assert_eq!(diamond.error, None);
    assert_eq!(
        diamond.total_pool_earnings,
        "340282366920938463463.374607431768211456"
    );
}

#[tokio::test]
async fn test_failing_nft_contract_gets_fallback() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());
    let reader = healthy_reader();
    reader.fail_contract(COLLECTIONS[1].2);

    let response = aggregator(&http)
        .aggregate(&mainnet_context(Some(reader)))
        .await
        .unwrap();

    let nft_details = response.nft_details.unwrap();
    assert_eq!(nft_details.len(), 4);
    let carbon = &nft_details[1];
    assert_eq!(carbon.name, "Carbon NFT");
    assert_eq!(carbon.symbol, "ERROR");
    assert_eq!(carbon.total_supply, "0");
    assert!(carbon.error.is_some());
    assert_eq!(nft_details[0].total_supply, "150");
}

#[tokio::test]
async fn test_unconfigured_bindings_are_skipped() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());
    let mut ctx = mainnet_context(Some(healthy_reader()));
    ctx.collections[2].distributor = None;
    ctx.collections[3].nft_contract = None;

    let response = aggregator(&http).aggregate(&ctx).await.unwrap();

    assert_eq!(response.nft_details.unwrap().len(), 3);
    assert_eq!(response.distributor_details.unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_collection_in_catalogue_yields_zero_total() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), json!({"items": []}));

    let response = aggregator(&http)
        .aggregate(&mainnet_context(Some(healthy_reader())))
        .await
        .unwrap();

    assert_eq!(response.total_nft_types, 0);
    let distributors = response.distributor_details.unwrap();
    assert!(distributors.iter().all(|d| d.total_type_earnings == "0"));
    assert!(distributors.iter().all(|d| d.error.is_none()));
}

#[tokio::test]
async fn test_null_catalogue_items_are_an_empty_catalogue() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), json!({"items": null, "next_page_params": null}));

    let response = aggregator(&http)
        .aggregate(&mainnet_context(Some(healthy_reader())))
        .await
        .unwrap();

    assert_eq!(response.total_nft_types, 0);
    assert!(response.data.is_empty());
    let distributors = response.distributor_details.unwrap();
    assert_eq!(distributors.len(), 4);
    assert!(distributors.iter().all(|d| d.total_type_earnings == "0"));
}

#[tokio::test]
async fn test_mainnet_without_rpc_returns_catalogue_with_error() {
    let http = FakeHttp::new();
    http.respond(&catalogue_url(), catalogue());

    let response = aggregator(&http)
        .aggregate(&mainnet_context(None))
        .await
        .unwrap();

    assert_eq!(response.total_nft_types, 4);
    assert_eq!(
        response.message.as_deref(),
        Some("Partial data available - blockchain data fetch failed")
    );
    assert!(response.error.is_some());
    assert!(response.distributor_details.is_none());
}

#[tokio::test]
async fn test_catalogue_failure_fails_the_request() {
    let http = FakeHttp::new();
    http.fail(&catalogue_url(), 500, "boom");

    let err = aggregator(&http)
        .aggregate(&mainnet_context(Some(healthy_reader())))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UpstreamUnavailable(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_nft_earnings_reports_failures_per_token() {
    let reader = healthy_reader();
    let healthy = Address::parse(COLLECTIONS[0].3).unwrap();

    let response = fetch_nft_earnings(&reader, &healthy, &[1, 2]).await;
    assert_eq!(response.nft_earnings.len(), 2);
    assert!(response
        .nft_earnings
        .iter()
        .all(|e| e.status == EarningStatus::Success && e.current_earnings == "1.5"));

    reader.fail_contract(COLLECTIONS[1].3);
    let failing = Address::parse(COLLECTIONS[1].3).unwrap();
    let response = fetch_nft_earnings(&reader, &failing, &[7]).await;
    assert_eq!(response.nft_earnings[0].nft_id, 7);
    assert_eq!(response.nft_earnings[0].status, EarningStatus::Error);
    assert_eq!(response.nft_earnings[0].current_earnings, "0");
    assert!(response.nft_earnings[0].error.is_some());
}
