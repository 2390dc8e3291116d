//! Static receiving-address pools.
//!
//! Each `(method, chain)` key owns a fixed list of addresses. The rotating
//! endpoint cycles through the list with an in-memory counter that starts at
//! zero on process start; the random endpoint picks uniformly. Neither
//! checks the chain for incoming funds.

use crate::config::{AddressPoolConfig, ConfigStore, ConfigWatcher};
use kanau::processor::Processor;
use keyshop_sdk::objects::{AddressQuery, AddressStrategy, Chain, PaymentMethod};
use rand::seq::IndexedRandom;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Identifies one address pool.
///
/// The chain is dropped for methods that do not need one, so
/// `BTC` and `BTC` on `eth` resolve to the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressPoolKey {
    pub method: PaymentMethod,
    pub chain: Option<Chain>,
}

impl AddressPoolKey {
    pub fn new(method: PaymentMethod, chain: Option<Chain>) -> Self {
        let chain = if method.requires_chain() { chain } else { None };
        Self { method, chain }
    }
}

impl From<AddressQuery> for AddressPoolKey {
    fn from(query: AddressQuery) -> Self {
        Self::new(query.method, query.chain)
    }
}

struct AddressPool {
    key: AddressPoolKey,
    addresses: Vec<String>,
    cursor: Arc<AtomicUsize>,
}

/// All configured address pools.
///
/// Cheap to clone; clones share pools and counters.
#[derive(Clone)]
pub struct AddressBook {
    pools: ConfigStore<Vec<AddressPool>>,
}

impl AddressBook {
    pub fn new(configs: Vec<AddressPoolConfig>) -> Self {
        let pools = configs
            .into_iter()
            .map(|c| AddressPool {
                key: AddressPoolKey::new(c.method, c.chain),
                addresses: c.addresses,
                cursor: Arc::new(AtomicUsize::new(0)),
            })
            .collect();
        Self {
            pools: ConfigStore::new(pools),
        }
    }

    /// Replace all pools.
    ///
    /// A pool whose key and address list are unchanged keeps its rotation
    /// counter; every other pool starts again from the first address.
    pub async fn reload(&self, configs: Vec<AddressPoolConfig>) {
        let pools = {
            let current = self.pools.read().await;
            configs
                .into_iter()
                .map(|c| {
                    let key = AddressPoolKey::new(c.method, c.chain);
                    let cursor = current
                        .iter()
                        .find(|p| p.key == key && p.addresses == c.addresses)
                        .map(|p| Arc::clone(&p.cursor))
                        .unwrap_or_default();
                    AddressPool {
                        key,
                        addresses: c.addresses,
                        cursor,
                    }
                })
                .collect::<Vec<_>>()
        };
        let count = pools.len();
        let version = self.pools.update(pools).await;
        info!(pools = count, version, "Address pools reloaded");
    }

    pub fn subscribe(&self) -> ConfigWatcher {
        self.pools.subscribe()
    }
}

/// Pick one address from the pool for `key`.
#[derive(Debug, Clone, Copy)]
pub struct PickAddress {
    pub strategy: AddressStrategy,
    pub key: AddressPoolKey,
}

impl Processor<PickAddress> for AddressBook {
    type Output = Option<String>;
    type Error = Infallible;

    #[tracing::instrument(skip_all, name = "AddressBook:PickAddress")]
    async fn process(&self, req: PickAddress) -> Result<Option<String>, Infallible> {
        let pools = self.pools.read().await;
        let Some(pool) = pools.iter().find(|p| p.key == req.key) else {
            debug!(method = %req.key.method, chain = ?req.key.chain, "No address pool configured");
            return Ok(None);
        };
        if pool.addresses.is_empty() {
            return Ok(None);
        }

        let picked = match req.strategy {
            AddressStrategy::Rotating => {
                let n = pool.cursor.fetch_add(1, Ordering::Relaxed);
                pool.addresses.get(n % pool.addresses.len()).cloned()
            }
            AddressStrategy::Random => pool.addresses.choose(&mut rand::rng()).cloned(),
        };
        debug!(
            method = %req.key.method,
            chain = ?req.key.chain,
            strategy = ?req.strategy,
            "Picked address"
        );
        Ok(picked)
    }
}
