//! TOML file configuration structures.
//!
//! These structs directly map to the `keyshop.toml` file format.

use keyshop_sdk::objects::{Chain, PaymentMethod};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub price_api: PriceApiConfig,
    #[serde(default)]
    pub address_pools: Vec<AddressPoolConfig>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Host names served by this instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Host that alias hosts redirect to. Without it nothing redirects.
    #[serde(default)]
    pub canonical_host: Option<String>,
    /// Extra host names that should redirect to `canonical_host`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Upstream market-data API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceApiConfig {
    #[serde(default = "default_price_api_base")]
    pub base_url: Url,
    #[serde(default = "default_price_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for PriceApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_price_api_base(),
            timeout_secs: default_price_api_timeout(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_price_api_base() -> Url {
    Url::parse("https://api.coingecko.com/api/v3/").expect("valid default url")
}

fn default_price_api_timeout() -> u64 {
    10
}

/// A static list of receiving addresses for one method (and chain).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressPoolConfig {
    pub method: PaymentMethod,
    #[serde(default)]
    pub chain: Option<Chain>,
    pub addresses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[site]
canonical_host = "keys.example.com"
aliases = ["www.keys.example.com"]

[price_api]
base_url = "https://prices.example.com/api/v3/"

[[address_pools]]
method = "BTC"
addresses = ["bc1qaaa", "bc1qbbb"]

[[address_pools]]
method = "USDT"
chain = "tron"
addresses = ["TXyz"]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.site.aliases.len(), 1);
        assert_eq!(config.price_api.timeout_secs, 10);
        assert_eq!(config.address_pools.len(), 2);
        assert_eq!(config.address_pools[1].chain, Some(Chain::Tron));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(
            config.price_api.base_url.as_str(),
            "https://api.coingecko.com/api/v3/"
        );
        assert!(config.site.canonical_host.is_none());
        assert!(config.address_pools.is_empty());
    }
}
