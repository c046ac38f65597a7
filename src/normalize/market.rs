//! Normalizer for the market-data coin snapshot.

use super::schema::DefaultValue::{Str, Unknown, Zero};
use super::schema::FieldKind::{Number, Str as Text};
use super::schema::{apply_schema, lookup, number_at, FieldSpec};
use crate::error::{ServiceError, ServiceResult};
use serde_json::Value;

const COIN: &[FieldSpec] = &[
    FieldSpec::new("price.current", "market_data.current_price.usd", Number, Zero),
    FieldSpec::new("price.change24h", "market_data.price_change_percentage_24h", Number, Zero),
    FieldSpec::new("price.change7d", "market_data.price_change_percentage_7d", Number, Zero),
    FieldSpec::new("price.change30d", "market_data.price_change_percentage_30d", Number, Zero),
    FieldSpec::new("price.change60d", "market_data.price_change_percentage_60d", Number, Zero),
    FieldSpec::new("price.change200d", "market_data.price_change_percentage_200d", Number, Zero),
    FieldSpec::new("price.ath", "market_data.ath.usd", Number, Zero),
    FieldSpec::new("price.athDate", "market_data.ath_date.usd", Text, Unknown),
    FieldSpec::new("price.atl", "market_data.atl.usd", Number, Zero),
    FieldSpec::new("price.atlDate", "market_data.atl_date.usd", Text, Unknown),
    FieldSpec::new("price.high24h", "market_data.high_24h.usd", Number, Zero),
    FieldSpec::new("price.low24h", "market_data.low_24h.usd", Number, Zero),
    FieldSpec::new("price.priceInBtc", "market_data.current_price.btc", Number, Zero),
    FieldSpec::new("price.priceInEth", "market_data.current_price.eth", Number, Zero),
    FieldSpec::new("supply.total", "market_data.total_supply", Number, Zero),
    FieldSpec::new("supply.circulating", "market_data.circulating_supply", Number, Zero),
    FieldSpec::new("supply.max", "market_data.max_supply", Number, Zero),
    FieldSpec::new("supply.circulationChange24h", "market_data.circulating_supply_change_24h", Number, Zero),
    FieldSpec::new("market.marketCap", "market_data.market_cap.usd", Number, Zero),
    FieldSpec::new("market.marketCapRank", "market_data.market_cap_rank", Number, Zero),
    FieldSpec::new("market.volume24h", "market_data.total_volume.usd", Number, Zero),
    FieldSpec::new("market.marketCapChange24h", "market_data.market_cap_change_percentage_24h", Number, Zero),
    FieldSpec::new("market.fullyDilutedValuation", "market_data.fully_diluted_valuation.usd", Number, Zero),
    FieldSpec::new("market.totalValueLocked", "market_data.total_value_locked.usd", Number, Zero),
    FieldSpec::new("market.mcapToTvlRatio", "market_data.mcap_to_tvl_ratio", Number, Zero),
    FieldSpec::new("community.twitterFollowers", "community_data.twitter_followers", Number, Zero),
    FieldSpec::new("community.telegramUsers", "community_data.telegram_channel_user_count", Number, Zero),
    FieldSpec::new("community.redditSubscribers", "community_data.reddit_subscribers", Number, Zero),
    FieldSpec::new("community.sentimentVotesUpPercentage", "sentiment_votes_up_percentage", Number, Zero),
    FieldSpec::new("community.sentimentVotesDownPercentage", "sentiment_votes_down_percentage", Number, Zero),
    FieldSpec::new("developer.forks", "developer_data.forks", Number, Zero),
    FieldSpec::new("developer.stars", "developer_data.stars", Number, Zero),
    FieldSpec::new("developer.subscribers", "developer_data.subscribers", Number, Zero),
    FieldSpec::new("developer.totalIssues", "developer_data.total_issues", Number, Zero),
    FieldSpec::new("developer.closedIssues", "developer_data.closed_issues", Number, Zero),
    FieldSpec::new("developer.pullRequestsMerged", "developer_data.pull_requests_merged", Number, Zero),
    FieldSpec::new("developer.commitCount4Weeks", "developer_data.commit_count_4_weeks", Number, Zero),
    FieldSpec::new("lastUpdated", "last_updated", Text, Unknown),
];

const TICKER: &[FieldSpec] = &[
    FieldSpec::new("name", "market.name", Text, Unknown),
    FieldSpec::new("volume24h", "converted_volume.usd", Number, Zero),
    FieldSpec::new("trustScore", "trust_score", Text, Unknown),
    FieldSpec::new("lastTraded", "last_traded_at", Text, Str("never")),
];

fn malformed(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::MalformedUpstreamData(e.to_string())
}

/// Nested market snapshot with derived `supply.locked`,
/// `market.volumeToMarketCap` and the `exchanges` list.
pub fn normalize_market_info(raw: &Value) -> ServiceResult<Value> {
    let mut info = apply_schema(raw, COIN).map_err(malformed)?;

    let locked = number_at(&info, "supply.total") - number_at(&info, "supply.circulating");
    info["supply"]["locked"] = Value::from(locked);

    let market_cap = number_at(&info, "market.marketCap");
    let ratio = if market_cap == 0.0 {
        0.0
    } else {
        number_at(&info, "market.volume24h") / market_cap
    };
    info["market"]["volumeToMarketCap"] = Value::from(ratio);

    let exchanges = match lookup(raw, "tickers").map_err(malformed)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(tickers)) => tickers
            .iter()
            .map(|ticker| apply_schema(ticker, TICKER).map_err(malformed))
            .collect::<ServiceResult<Vec<_>>>()?,
        Some(_) => return Err(malformed("tickers is not a list")),
    };
    info["exchanges"] = Value::Array(exchanges);

    Ok(info)
}
