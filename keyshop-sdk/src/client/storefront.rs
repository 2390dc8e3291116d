//! Storefront API client (checkout page → Keyshop server).
//!
//! None of the storefront endpoints are authenticated; the client is a thin
//! typed wrapper that maps each route to a method.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{
    AddressQuery, AddressResponse, AddressStrategy, MethodInfo, Plan, PriceTable, QUOTE_CURRENCY,
};

/// Typed HTTP client for the storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: Client,
    base_url: Url,
}

impl StorefrontClient {
    /// Create a new `StorefrontClient` rooted at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/plans` – the static plan table.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, ClientError> {
        let url = self.base_url.join("/api/plans")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/methods` – accepted assets and their networks.
    pub async fn list_methods(&self) -> Result<Vec<MethodInfo>, ClientError> {
        let url = self.base_url.join("/api/methods")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/address/{rotating,random}` – a receiving address for the
    /// given method and chain.
    pub async fn request_address(
        &self,
        strategy: AddressStrategy,
        query: AddressQuery,
    ) -> Result<AddressResponse, ClientError> {
        let url = self.base_url.join(strategy.path())?;
        let resp = self.http.get(url).query(&query).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/price` – live USD quotes for the given market-data ids.
    pub async fn fetch_prices(&self, ids: &str) -> Result<PriceTable, ClientError> {
        let url = self.base_url.join("/api/price")?;
        let resp = self
            .http
            .get(url)
            .query(&[("ids", ids), ("vs", QUOTE_CURRENCY)])
            .send()
            .await?;
        parse_response(resp).await
    }
}
