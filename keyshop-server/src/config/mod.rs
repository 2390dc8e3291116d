//! Configuration module for keyshop-server.
//!
//! Handles loading configuration from the TOML file and CLI overrides,
//! and validating the address pools.

pub mod file;

use crate::config::file::{AddressPoolConfig as FileAddressPoolConfig, FileConfig};
use keyshop_core::address_book::AddressPoolKey;
use keyshop_core::config::{
    AddressPoolConfig, PriceApiConfig, ServerConfig, SharedConfig, SiteConfig,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub price_api: PriceApiConfig,
    pub address_pools: Vec<AddressPoolConfig>,
}

impl LoadedConfig {
    /// Split into the lock-wrapped sections and the address pools.
    pub fn into_shared(self) -> (SharedConfig, Vec<AddressPoolConfig>) {
        (
            SharedConfig::new(self.server, self.site, self.price_api),
            self.address_pools,
        )
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, override, validate and convert the configuration.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let mut seen: Vec<AddressPoolKey> = Vec::new();
    for pool in &config.address_pools {
        match (pool.method.requires_chain(), pool.chain) {
            (true, None) => {
                return Err(ConfigError::ValidationError(format!(
                    "address pool for {} needs a chain",
                    pool.method
                )));
            }
            (true, Some(chain)) if !pool.method.supports_chain(chain) => {
                return Err(ConfigError::ValidationError(format!(
                    "{} is not available on {}",
                    pool.method, chain
                )));
            }
            (false, Some(chain)) => {
                return Err(ConfigError::ValidationError(format!(
                    "address pool for {} must not set a chain (got {})",
                    pool.method, chain
                )));
            }
            _ => {}
        }

        let key = AddressPoolKey::new(pool.method, pool.chain);
        if seen.contains(&key) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate address pool for {} {:?}",
                pool.method, pool.chain
            )));
        }
        seen.push(key);

        if pool.addresses.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "address pool for {} contains a blank address",
                pool.method
            )));
        }
    }

    if let Some(host) = &config.site.canonical_host {
        if !is_plain_host(host) {
            return Err(ConfigError::ValidationError(format!(
                "canonical host {host:?} must be a bare host name"
            )));
        }
        if config.site.aliases.iter().any(|a| a.eq_ignore_ascii_case(host)) {
            return Err(ConfigError::ValidationError(format!(
                "canonical host {host} is also listed as an alias"
            )));
        }
    }

    Ok(())
}

/// Usable as the authority of a redirect target: non-empty, no path, no
/// whitespace or control characters.
fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '/')
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let mut base_url = file_config.price_api.base_url;
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        site: SiteConfig {
            canonical_host: file_config.site.canonical_host,
            aliases: file_config
                .site
                .aliases
                .into_iter()
                .map(|a| a.to_ascii_lowercase())
                .collect(),
        },
        price_api: PriceApiConfig {
            base_url,
            timeout: Duration::from_secs(file_config.price_api.timeout_secs),
        },
        address_pools: file_config
            .address_pools
            .into_iter()
            .map(convert_pool)
            .collect(),
    }
}

fn convert_pool(p: FileAddressPoolConfig) -> AddressPoolConfig {
    AddressPoolConfig {
        method: p.method,
        chain: p.chain,
        addresses: p.addresses.into_iter().map(|a| a.trim().to_owned()).collect(),
    }
}
