//! Timer-driven checkout driver.
//!
//! While a payment is open two tasks run side by side:
//!
//! - the countdown, ticking every [`COUNTDOWN_PERIOD`] until the window
//!   runs out, then stopping the rotator and itself;
//! - the status rotator, advancing the waiting message every
//!   [`STATUS_ROTATION_PERIOD`].
//!
//! Both are aborted together on reset and when the driver is dropped.

use kanau::processor::Processor;
use keyshop_sdk::objects::{Chain, PaymentMethod, PriceTable};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

use super::CheckoutError;
use super::session::{CheckoutSession, Countdown};
use crate::processors::address_requester::{AddressRequester, AddressSource, RequestAddress};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
pub const STATUS_ROTATION_PERIOD: Duration = Duration::from_millis(1500);

struct PaymentTimers {
    countdown: JoinHandle<()>,
    rotator: JoinHandle<()>,
}

impl PaymentTimers {
    fn is_running(&self) -> bool {
        !self.countdown.is_finished() || !self.rotator.is_finished()
    }
}

impl Drop for PaymentTimers {
    fn drop(&mut self) {
        self.countdown.abort();
        self.rotator.abort();
    }
}

/// Drives one [`CheckoutSession`] and its payment timers.
pub struct CheckoutDriver<S> {
    session: Arc<Mutex<CheckoutSession>>,
    snapshot_tx: Arc<watch::Sender<CheckoutSession>>,
    requester: AddressRequester<S>,
    timers: Option<PaymentTimers>,
}

impl<S: AddressSource> CheckoutDriver<S> {
    pub fn new(source: S) -> Self {
        let session = CheckoutSession::new();
        let (snapshot_tx, _) = watch::channel(session.clone());
        Self {
            session: Arc::new(Mutex::new(session)),
            snapshot_tx: Arc::new(snapshot_tx),
            requester: AddressRequester::new(source),
            timers: None,
        }
    }

    /// Receive a snapshot after every change, timers included.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutSession> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> CheckoutSession {
        self.session.lock().await.clone()
    }

    /// Whether either payment timer is still alive.
    pub fn timers_running(&self) -> bool {
        self.timers.as_ref().is_some_and(PaymentTimers::is_running)
    }

    async fn update<T>(
        &self,
        f: impl FnOnce(&mut CheckoutSession) -> Result<T, CheckoutError>,
    ) -> Result<T, CheckoutError> {
        let mut session = self.session.lock().await;
        let out = f(&mut session)?;
        self.snapshot_tx.send_replace(session.clone());
        Ok(out)
    }

    pub async fn select_plan(&self, plan_id: &str) -> Result<(), CheckoutError> {
        self.update(|s| s.select_plan(plan_id)).await
    }

    pub async fn set_email(&self, email: &str) -> Result<(), CheckoutError> {
        self.update(|s| s.set_email(email)).await
    }

    pub async fn select_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.update(|s| s.select_method(method)).await
    }

    pub async fn select_chain(&self, chain: Chain) -> Result<(), CheckoutError> {
        self.update(|s| s.select_chain(chain)).await
    }

    /// The generate action: `select → pay`.
    ///
    /// Checks the guards, requests an address, locks the previewed amount
    /// and starts both timers.
    pub async fn generate(&mut self, prices: &PriceTable) -> Result<(), CheckoutError> {
        let (amount, request) = {
            let session = self.session.lock().await;
            let amount = session.validate_generate(prices)?;
            let request = RequestAddress {
                method: session.method(),
                chain: session.chain(),
            };
            (amount, request)
        };

        let address = match self.requester.process(request).await {
            Ok(address) => address,
            Err(never) => match never {},
        };

        let session_id = self
            .update(|s| {
                s.begin_payment(address, amount)?;
                Ok(s.id())
            })
            .await?;
        info!(%session_id, method = %request.method, %amount, "Payment window opened");

        self.timers = Some(self.spawn_timers());
        Ok(())
    }

    /// The reset action: stop both timers and return to `select`.
    pub async fn reset(&mut self) {
        self.timers = None;
        let mut session = self.session.lock().await;
        session.reset();
        self.snapshot_tx.send_replace(session.clone());
        debug!(session_id = %session.id(), "Checkout reset");
    }

    fn spawn_timers(&self) -> PaymentTimers {
        let rotator = {
            let session = Arc::clone(&self.session);
            let snapshot_tx = Arc::clone(&self.snapshot_tx);
            tokio::spawn(async move {
                let mut ticker = interval_at(
                    Instant::now() + STATUS_ROTATION_PERIOD,
                    STATUS_ROTATION_PERIOD,
                );
                loop {
                    ticker.tick().await;
                    let mut s = session.lock().await;
                    if !s.rotate_status() {
                        break;
                    }
                    snapshot_tx.send_replace(s.clone());
                }
            })
        };

        let rotator_abort = rotator.abort_handle();
        let countdown = {
            let session = Arc::clone(&self.session);
            let snapshot_tx = Arc::clone(&self.snapshot_tx);
            tokio::spawn(async move {
                let mut ticker =
                    interval_at(Instant::now() + COUNTDOWN_PERIOD, COUNTDOWN_PERIOD);
                loop {
                    ticker.tick().await;
                    let mut s = session.lock().await;
                    let outcome = s.tick_countdown();
                    snapshot_tx.send_replace(s.clone());
                    match outcome {
                        Countdown::Running(_) => {}
                        Countdown::Expired => {
                            rotator_abort.abort();
                            info!(session_id = %s.id(), "Payment window expired");
                            break;
                        }
                        Countdown::Halted => break,
                    }
                }
            })
        };

        PaymentTimers { countdown, rotator }
    }
}
