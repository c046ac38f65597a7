//! HTTP handlers.
//!
//! Each handler captures one [`RequestContext`](crate::services::RequestContext)
//! on entry and hands it to the service layer. Handlers hold no logic beyond
//! parameter parsing and response shaping.

use super::AppState;
use crate::cache::Cached;
use crate::domain::Address;
use crate::error::ServiceError;
use crate::metrics::MetricsSummary;
use crate::models::{NftEarningsResponse, NftInfoResponse};
use crate::services::{fetch_nft_earnings, DEFAULT_LIMIT, DEFAULT_PAGE};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Error response: `{ "error": ... }` with the status of the failure.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Payload fields plus `source`. Non-object payloads go under `data`.
fn with_source(cached: Cached<Value>) -> Json<Value> {
    let source = json!(cached.source);
    let body = match cached.payload {
        Value::Object(mut fields) => {
            fields.insert("source".to_string(), source);
            Value::Object(fields)
        }
        other => json!({ "data": other, "source": source }),
    };
    Json(body)
}

pub async fn root() -> &'static str {
    "explorer-gateway is running"
}

/// GET /api/test
pub async fn test_connection(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ctx = state.contexts.capture();
    let connected = match ctx.explorer_api.as_deref() {
        Some(base) => state.resources.explorer().test_connection(base).await,
        None => false,
    };

    Json(json!({
        "status": if connected { "connected" } else { "error" },
        "network": ctx.network,
        "apiUrl": ctx.explorer_api,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/network
pub async fn get_network(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "network": state.contexts.selector().get(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NetworkRequest {
    #[serde(default)]
    network: String,
}

/// POST /api/network
pub async fn set_network(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NetworkRequest>,
) -> Response {
    match state.contexts.selector().set_str(&request.network) {
        Ok(network) => Json(json!({
            "network": network,
            "message": format!("Network switched to {}", network),
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid network" })),
        )
            .into_response(),
    }
}

/// GET /api/balance/:address
pub async fn balance(State(state): State<Arc<AppState>>, Path(address): Path<String>) -> ApiResult<Value> {
    let ctx = state.contexts.capture();
    Ok(with_source(state.resources.balance(&ctx, &address).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

/// GET /api/transactions/:address
pub async fn transactions(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Value> {
    let ctx = state.contexts.capture();
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(with_source(
        state.resources.transactions(&ctx, &address, page, limit).await?,
    ))
}

/// GET /api/token-balances/:address
pub async fn token_balances(State(state): State<Arc<AppState>>, Path(address): Path<String>) -> ApiResult<Value> {
    let ctx = state.contexts.capture();
    Ok(with_source(state.resources.token_balances(&ctx, &address).await?))
}

/// GET /api/address/:address
pub async fn address_info(State(state): State<Arc<AppState>>, Path(address): Path<String>) -> ApiResult<Value> {
    let ctx = state.contexts.capture();
    Ok(with_source(state.resources.address_info(&ctx, &address).await?))
}

/// GET /api/address/:address/tokens
pub async fn address_tokens(State(state): State<Arc<AppState>>, Path(address): Path<String>) -> ApiResult<Value> {
    let ctx = state.contexts.capture();
    Ok(with_source(state.resources.address_tokens(&ctx, &address).await?))
}

/// GET /api/nft-info
pub async fn nft_info(State(state): State<Arc<AppState>>) -> ApiResult<NftInfoResponse> {
    let ctx = state.contexts.capture();
    Ok(Json(state.aggregator.aggregate(&ctx).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct EarningsQuery {
    ids: Option<String>,
}

/// Comma-separated token ids.
fn parse_ids(raw: Option<&str>) -> Result<Vec<u64>, ServiceError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("ids is required".to_string()))?;

    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| ServiceError::InvalidInput(format!("invalid token id {}", part.trim())))
        })
        .collect()
}

/// GET /api/nft-earnings/:distributor?ids=1,2,3
pub async fn nft_earnings(
    State(state): State<Arc<AppState>>,
    Path(distributor): Path<String>,
    Query(query): Query<EarningsQuery>,
) -> ApiResult<NftEarningsResponse> {
    let ctx = state.contexts.capture();
    let distributor = Address::parse(&distributor).map_err(ServiceError::from)?;
    let ids = parse_ids(query.ids.as_deref())?;
    let reader = ctx.chain_reader()?;

    Ok(Json(fetch_nft_earnings(reader.as_ref(), &distributor, &ids).await))
}

/// GET /api/vsg-info
pub async fn market_info(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    Ok(with_source(state.resources.market_info().await?))
}

/// GET /api/metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSummary> {
    Json(state.metrics.summary())
}
