//! Application state shared across all request handlers.

use keyshop_core::address_book::AddressBook;
use keyshop_core::config::{AddressPoolConfig, SharedConfig};
use keyshop_core::market_data::MarketDataFetcher;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Receiving-address pools and their rotation counters.
    pub addresses: AddressBook,
    /// Upstream price client, rebuilt when the price API section changes.
    pub market_data: Arc<RwLock<MarketDataFetcher>>,
}

impl AppState {
    pub async fn new(config: SharedConfig, address_pools: Vec<AddressPoolConfig>) -> Self {
        let market_data = MarketDataFetcher::new(&*config.price_api.read().await);
        Self {
            config,
            addresses: AddressBook::new(address_pools),
            market_data: Arc::new(RwLock::new(market_data)),
        }
    }

    /// A handle to the current price client.
    pub async fn market_data(&self) -> MarketDataFetcher {
        self.market_data.read().await.clone()
    }
}
