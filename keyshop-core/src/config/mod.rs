//! Runtime configuration types for the Keyshop storefront.
//!
//! These types represent the validated configuration used by the server.
//! Loading and parsing the TOML file is handled by the server crate.

mod config_store;

pub use config_store::{ConfigStore, ConfigWatcher};

use keyshop_sdk::objects::{Chain, PaymentMethod};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
}

/// Canonical host and the alias hosts that redirect to it.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    pub canonical_host: Option<String>,
    /// Lowercased, without ports.
    pub aliases: Vec<String>,
}

impl SiteConfig {
    /// Returns the canonical host if `host` is one of the aliases.
    ///
    /// `host` is a raw `Host` header value; any port suffix is ignored.
    pub fn redirect_target(&self, host: &str) -> Option<&str> {
        let canonical = self.canonical_host.as_deref()?;
        let bare = host.rsplit_once(':').map_or(host, |(h, _)| h);
        let bare = bare.to_ascii_lowercase();
        self.aliases
            .iter()
            .any(|alias| *alias == bare)
            .then_some(canonical)
    }
}

/// Upstream market-data API settings.
#[derive(Debug, Clone)]
pub struct PriceApiConfig {
    /// Base URL ending in a slash, e.g. `https://api.coingecko.com/api/v3/`.
    pub base_url: Url,
    pub timeout: Duration,
}

/// One configured address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPoolConfig {
    pub method: PaymentMethod,
    pub chain: Option<Chain>,
    pub addresses: Vec<String>,
}

/// Shared configuration state with separate locks for each section.
///
/// Address pools are not held here; they live in the
/// [`AddressBook`](crate::address_book::AddressBook) so that rotation
/// counters survive a reload.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub site: Arc<RwLock<SiteConfig>>,
    pub price_api: Arc<RwLock<PriceApiConfig>>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, site: SiteConfig, price_api: PriceApiConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            site: Arc::new(RwLock::new(site)),
            price_api: Arc::new(RwLock::new(price_api)),
        }
    }
}
