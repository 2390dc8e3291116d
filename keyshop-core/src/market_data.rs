//! Upstream market-data fetcher.
//!
//! Calls the public `simple/price` endpoint and hands the body back
//! untouched. There is no caching, retry, or backoff: each storefront
//! request maps to exactly one upstream request.

use crate::config::PriceApiConfig;
use kanau::processor::Processor;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors that can occur while querying the market-data API.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("upstream body is not JSON: {0}")]
    Body(#[from] serde_json::Error),
}

/// Thin client for the market-data API.
#[derive(Debug, Clone)]
pub struct MarketDataFetcher {
    http: reqwest::Client,
    base_url: Url,
}

impl MarketDataFetcher {
    pub fn new(config: &PriceApiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: config.base_url.clone(),
        }
    }
}

/// Query `simple/price` for `ids` quoted in `vs_currencies`.
#[derive(Debug, Clone)]
pub struct FetchSimplePrice {
    /// Comma-separated market-data ids.
    pub ids: String,
    /// Comma-separated quote currencies.
    pub vs_currencies: String,
}

impl Processor<FetchSimplePrice> for MarketDataFetcher {
    type Output = serde_json::Value;
    type Error = MarketDataError;

    #[tracing::instrument(skip_all, err, name = "HTTP:FetchSimplePrice")]
    async fn process(&self, query: FetchSimplePrice) -> Result<serde_json::Value, MarketDataError> {
        let url = self.base_url.join("simple/price")?;
        let resp = self
            .http
            .get(url)
            .query(&[
                ("ids", query.ids.as_str()),
                ("vs_currencies", query.vs_currencies.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MarketDataError::Upstream {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        debug!(ids = %query.ids, "Fetched upstream prices");
        Ok(body)
    }
}
