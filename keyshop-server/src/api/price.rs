use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use keyshop_core::market_data::{FetchSimplePrice, MarketDataError};
use keyshop_sdk::objects::{PriceTable, QUOTE_CURRENCY};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct PriceQuery {
    /// Comma-separated market-data ids; every priced method when absent.
    #[serde(default)]
    ids: Option<String>,
    /// Quote currency, `usd` when absent.
    #[serde(default)]
    vs: Option<String>,
}

/// `GET /price`: proxy the upstream `simple/price` call.
///
/// The upstream body is returned as-is. Nothing is cached: every request
/// costs one upstream request.
pub(super) async fn get_price(
    state: State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<impl IntoResponse, PriceApiError> {
    let ids = normalize_list(query.ids).unwrap_or_else(PriceTable::all_ids);
    let vs_currencies = normalize_list(query.vs).unwrap_or_else(|| QUOTE_CURRENCY.to_owned());

    let body = state
        .market_data()
        .await
        .process(FetchSimplePrice { ids, vs_currencies })
        .await
        .map_err(PriceApiError::Upstream)?;

    Ok(Json(body))
}

/// Trim entries and drop empty ones; `None` if nothing is left.
fn normalize_list(raw: Option<String>) -> Option<String> {
    let joined = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}

/// Errors that can occur in the price handler.
#[derive(Debug)]
pub(super) enum PriceApiError {
    /// The market-data API could not be reached or answered badly.
    Upstream(MarketDataError),
}

impl IntoResponse for PriceApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            PriceApiError::Upstream(e) => {
                tracing::error!(error = %e, "Price API upstream error");
                (StatusCode::BAD_GATEWAY, "price service unavailable").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_list() {
        assert_eq!(
            normalize_list(Some(" Bitcoin, ,monero ".into())).as_deref(),
            Some("bitcoin,monero")
        );
        assert_eq!(normalize_list(Some(" , ".into())), None);
        assert_eq!(normalize_list(None), None);
    }
}
