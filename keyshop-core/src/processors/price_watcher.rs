//! PriceWatcher processor.
//!
//! The PriceWatcher is responsible for:
//! - Fetching live quotes for every priced method as soon as it starts
//! - Refetching on a fixed interval
//! - Publishing the latest `PriceTable` through a `watch` channel
//!
//! A failed fetch keeps the last good table. There is no retry or backoff
//! beyond the next scheduled tick.

use async_trait::async_trait;
use keyshop_sdk::client::{ClientError, StorefrontClient};
use keyshop_sdk::objects::PriceTable;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default refresh interval.
pub const DEFAULT_PRICE_INTERVAL: Duration = Duration::from_secs(60);

/// Shorter intervals are raised to this.
pub const MIN_PRICE_INTERVAL: Duration = Duration::from_secs(1);

/// Where live quotes come from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self, ids: &str) -> Result<PriceTable, ClientError>;
}

#[async_trait]
impl PriceSource for StorefrontClient {
    async fn fetch_prices(&self, ids: &str) -> Result<PriceTable, ClientError> {
        StorefrontClient::fetch_prices(self, ids).await
    }
}

pub struct PriceWatcher<S> {
    source: S,
    interval: Duration,
    ids: String,
    prices_tx: watch::Sender<PriceTable>,
}

impl<S: PriceSource> PriceWatcher<S> {
    /// Create a watcher and the receiver its quotes are published on.
    ///
    /// The receiver starts with an empty table. `interval` is clamped to
    /// [`MIN_PRICE_INTERVAL`].
    pub fn new(source: S, interval: Duration) -> (Self, watch::Receiver<PriceTable>) {
        let (prices_tx, prices_rx) = watch::channel(PriceTable::default());
        let watcher = Self {
            source,
            interval: interval.max(MIN_PRICE_INTERVAL),
            ids: PriceTable::all_ids(),
            prices_tx,
        };
        (watcher, prices_rx)
    }

    /// Run until `shutdown_rx` turns `true` or its sender is dropped.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "PriceWatcher started");
        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("PriceWatcher received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }

        info!("PriceWatcher shutdown complete");
    }

    /// Fetch once and publish on success.
    pub async fn refresh(&self) -> bool {
        match self.source.fetch_prices(&self.ids).await {
            Ok(table) => {
                debug!(assets = table.0.len(), "Fetched live prices");
                self.prices_tx.send_replace(table);
                true
            }
            Err(e) => {
                warn!(error = %e, "Price fetch failed, keeping previous quotes");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyshop_sdk::objects::PaymentMethod;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Succeeds on odd-numbered calls, fails on even ones.
    #[derive(Clone)]
    struct FlakySource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PriceSource for FlakySource {
        async fn fetch_prices(&self, ids: &str) -> Result<PriceTable, ClientError> {
            assert!(ids.contains("bitcoin"));
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n % 2 == 0 {
                return Err(ClientError::Api {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: String::new(),
                });
            }
            let json = format!(r#"{{"bitcoin":{{"usd":{}}}}}"#, 1000 * n);
            Ok(serde_json::from_str(&json)?)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_on_start_and_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FlakySource {
            calls: calls.clone(),
        };
        let (watcher, mut prices_rx) = PriceWatcher::new(source, Duration::from_secs(60));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(watcher.run(shutdown_rx));

        prices_rx.changed().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            prices_rx.borrow().usd(PaymentMethod::Btc),
            Some(Decimal::from(1000))
        );

        // Second fetch fails: the first quote stays.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            prices_rx.borrow().usd(PaymentMethod::Btc),
            Some(Decimal::from(1000))
        );

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            prices_rx.borrow().usd(PaymentMethod::Btc),
            Some(Decimal::from(3000))
        );

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FlakySource {
            calls: calls.clone(),
        };
        let (watcher, mut prices_rx) = PriceWatcher::new(source, Duration::ZERO);
        assert_eq!(watcher.interval, MIN_PRICE_INTERVAL);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(watcher.run(shutdown_rx));
        prices_rx.changed().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
