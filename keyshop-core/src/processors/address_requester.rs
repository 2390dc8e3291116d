//! AddressRequester processor.
//!
//! Asks the storefront for a receiving address on the endpoint that serves
//! the selected method, and substitutes [`PLACEHOLDER_ADDRESS`] whenever
//! the call fails or the pool is empty. There is no retry.

use async_trait::async_trait;
use kanau::processor::Processor;
use keyshop_sdk::client::{ClientError, StorefrontClient};
use keyshop_sdk::objects::{AddressQuery, AddressStrategy, Chain, PaymentMethod};
use std::convert::Infallible;
use tracing::{debug, warn};

/// Shown when no real address could be obtained.
pub const PLACEHOLDER_ADDRESS: &str = "ADDRESS_UNAVAILABLE_CONTACT_SUPPORT";

/// Where receiving addresses come from.
#[async_trait]
pub trait AddressSource: Send + Sync {
    async fn fetch_address(
        &self,
        strategy: AddressStrategy,
        query: AddressQuery,
    ) -> Result<Option<String>, ClientError>;
}

#[async_trait]
impl AddressSource for StorefrontClient {
    async fn fetch_address(
        &self,
        strategy: AddressStrategy,
        query: AddressQuery,
    ) -> Result<Option<String>, ClientError> {
        Ok(self.request_address(strategy, query).await?.address)
    }
}

/// Request a receiving address for a method/chain selection.
#[derive(Debug, Clone, Copy)]
pub struct RequestAddress {
    pub method: PaymentMethod,
    pub chain: Option<Chain>,
}

pub struct AddressRequester<S> {
    source: S,
}

impl<S: AddressSource> AddressRequester<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: AddressSource> Processor<RequestAddress> for AddressRequester<S> {
    type Output = String;
    type Error = Infallible;

    async fn process(&self, req: RequestAddress) -> Result<String, Infallible> {
        let strategy = req.method.address_strategy();
        let query = AddressQuery {
            method: req.method,
            chain: req.chain,
        };

        match self.source.fetch_address(strategy, query).await {
            Ok(Some(address)) if !address.trim().is_empty() => {
                debug!(method = %req.method, chain = ?req.chain, "Received address");
                Ok(address)
            }
            Ok(_) => {
                warn!(
                    method = %req.method,
                    chain = ?req.chain,
                    "No address configured, using placeholder"
                );
                Ok(PLACEHOLDER_ADDRESS.to_owned())
            }
            Err(e) => {
                warn!(
                    method = %req.method,
                    chain = ?req.chain,
                    error = %e,
                    "Address request failed, using placeholder"
                );
                Ok(PLACEHOLDER_ADDRESS.to_owned())
            }
        }
    }
}
