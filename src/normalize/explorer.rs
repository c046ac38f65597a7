//! Normalizers for explorer responses.

use super::schema::{apply_schema, FieldSpec};
use crate::domain::{format_units_str, NATIVE_DECIMALS};
use crate::error::{ServiceError, ServiceResult};
use serde_json::{json, Value};

use super::schema::DefaultValue::{False, Str, Unknown, Zero};
use super::schema::FieldKind::{Bool, Flag, Number, Str as Text};

const ADDRESS_INFO: &[FieldSpec] = &[
    FieldSpec::new("address", "hash", Text, Unknown),
    FieldSpec::new("balance", "coin_balance", Text, Str("0")),
    FieldSpec::new("lastUpdatedBlock", "block_number_balance_updated_at", Number, Zero),
    FieldSpec::new("isContract", "is_contract", Bool, False),
    FieldSpec::new("hasTokens", "has_tokens", Bool, False),
    FieldSpec::new("hasTokenTransfers", "has_token_transfers", Bool, False),
    FieldSpec::new("isVerified", "is_verified", Bool, False),
    FieldSpec::new("creationTxHash", "creation_tx_hash", Text, Unknown),
    FieldSpec::new("creatorAddress", "creator_address_hash", Text, Unknown),
];

/// `module=account&action=tokenlist` result entries.
const TOKEN_LIST_ENTRY: &[FieldSpec] = &[
    FieldSpec::new("address", "contractAddress", Text, Unknown),
    FieldSpec::new("name", "name", Text, Unknown),
    FieldSpec::new("symbol", "symbol", Text, Unknown),
    FieldSpec::new("decimals", "decimals", Number, Zero),
    FieldSpec::new("type", "type", Text, Unknown),
    FieldSpec::new("balance", "balance", Text, Str("0")),
];

/// `/v2/addresses/{a}/tokens` when the upstream answers with a bare array.
const V2_TOKEN_FLAT: &[FieldSpec] = &[
    FieldSpec::new("address", "address", Text, Unknown),
    FieldSpec::new("name", "name", Text, Unknown),
    FieldSpec::new("symbol", "symbol", Text, Unknown),
    FieldSpec::new("decimals", "decimals", Number, Zero),
    FieldSpec::new("type", "type", Text, Unknown),
    FieldSpec::new("balance", "balance", Text, Str("0")),
];

/// `/v2/addresses/{a}/tokens` page items.
const V2_TOKEN_ITEM: &[FieldSpec] = &[
    FieldSpec::new("address", "token.address", Text, Unknown),
    FieldSpec::new("name", "token.name", Text, Unknown),
    FieldSpec::new("symbol", "token.symbol", Text, Unknown),
    FieldSpec::new("decimals", "token.decimals", Number, Zero),
    FieldSpec::new("type", "token.type", Text, Unknown),
    FieldSpec::new("balance", "value", Text, Str("0")),
];

const TRANSACTION: &[FieldSpec] = &[
    FieldSpec::new("hash", "hash", Text, Unknown),
    FieldSpec::new("blockNumber", "blockNumber", Number, Zero),
    FieldSpec::new("timestamp", "timeStamp", Number, Zero),
    FieldSpec::new("from", "from", Text, Unknown),
    FieldSpec::new("to", "to", Text, Unknown),
    FieldSpec::new("value", "value", Text, Str("0")),
    FieldSpec::new("gasUsed", "gasUsed", Text, Str("0")),
    FieldSpec::new("gasPrice", "gasPrice", Text, Str("0")),
    FieldSpec::new("isError", "isError", Flag, False),
];

fn malformed(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::MalformedUpstreamData(e.to_string())
}

fn apply(raw: &Value, schema: &[FieldSpec]) -> ServiceResult<Value> {
    apply_schema(raw, schema).map_err(malformed)
}

fn as_list<'a>(result: &'a Value, what: &str) -> ServiceResult<&'a [Value]> {
    match result {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(&[]),
        _ => Err(malformed(format!("{} is not a list", what))),
    }
}

/// Decimal string of `raw` base units, or an error for non-numeric input.
fn formatted(raw: &Value, decimals: u32) -> ServiceResult<Value> {
    let digits = raw.as_str().unwrap_or("0");
    format_units_str(digits, decimals)
        .map(Value::String)
        .map_err(malformed)
}

/// `{address, balance}` with the wei result formatted at 18 decimals.
pub fn normalize_balance(address: &str, result: &Value) -> ServiceResult<Value> {
    let wei = match result {
        Value::Null => "0".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(malformed("balance result is not a string")),
    };
    let balance = format_units_str(&wei, NATIVE_DECIMALS).map_err(malformed)?;
    Ok(json!({ "address": address, "balance": balance }))
}

pub fn normalize_address_info(raw: &Value) -> ServiceResult<Value> {
    apply(raw, ADDRESS_INFO)
}

/// Token list with a `formattedBalance` per token.
pub fn normalize_token_balances(address: &str, result: &Value) -> ServiceResult<Value> {
    let tokens = as_list(result, "token list")?
        .iter()
        .map(|entry| {
            let mut token = apply(entry, TOKEN_LIST_ENTRY)?;
            let decimals = token["decimals"].as_u64().unwrap_or(0).min(u32::MAX as u64) as u32;
            token["formattedBalance"] = formatted(&token["balance"], decimals)?;
            Ok(token)
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(json!({ "address": address, "tokens": tokens }))
}

/// Accepts a bare token array or an `{items: [{token, value}]}` page.
pub fn normalize_address_tokens(address: &str, raw: &Value) -> ServiceResult<Value> {
    let tokens = match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| apply(item, V2_TOKEN_FLAT))
            .collect::<ServiceResult<Vec<_>>>()?,
        Value::Object(page) => as_list(page.get("items").unwrap_or(&Value::Null), "items")?
            .iter()
            .map(|item| apply(item, V2_TOKEN_ITEM))
            .collect::<ServiceResult<Vec<_>>>()?,
        _ => return Err(malformed("token page is neither a list nor an object")),
    };

    Ok(json!({ "address": address, "tokens": tokens }))
}

pub fn normalize_transactions(address: &str, page: u32, limit: u32, result: &Value) -> ServiceResult<Value> {
    let transactions = as_list(result, "transaction list")?
        .iter()
        .map(|entry| {
            let mut tx = apply(entry, TRANSACTION)?;
            tx["formattedValue"] = formatted(&tx["value"], NATIVE_DECIMALS)?;
            Ok(tx)
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(json!({
        "address": address,
        "page": page,
        "limit": limit,
        "transactions": transactions,
    }))
}
