//! Checkout session state machine.
//!
//! ```text
//! select ──generate──▶ pay ──(countdown hits 0)──▶ pay (expired, timers halted)
//!   ▲                   │
//!   └──────reset────────┘
//! ```
//!
//! `done` exists as a step but no transition leads to it: nothing in this
//! system observes an incoming payment.

use keyshop_sdk::objects::{Chain, PaymentMethod, Plan, PriceTable};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::CheckoutError;
use super::email::is_valid_email;
use crate::catalog;

/// Length of the payment window.
pub const PAY_WINDOW_SECS: u32 = 30 * 60;

/// Messages cycled while waiting for a payment.
pub const STATUS_MESSAGES: &[&str] = &[
    "Waiting for your transaction…",
    "Scanning the mempool…",
    "Checking network confirmations…",
    "Still watching the address…",
    "Payments usually show up within a few minutes…",
];

pub const EXPIRED_MESSAGE: &str = "Payment window expired. Reset to generate a new address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Choosing plan, method, chain and email.
    Select,
    /// Address shown, countdown running.
    Pay,
    /// Payment confirmed. Unreachable here.
    Done,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running(u32),
    /// The window just ran out. Reported once per payment.
    Expired,
    /// Nothing left to count.
    Halted,
}

/// Client-local checkout state. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    id: Uuid,
    selected_plan: Plan,
    email: String,
    method: PaymentMethod,
    chain: Option<Chain>,
    address: Option<String>,
    locked_amount: Option<Decimal>,
    step: Step,
    pay_secs_remaining: u32,
    status_message: Option<&'static str>,
    #[serde(skip)]
    status_index: usize,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    /// A fresh session: first plan, `BTC`, no email.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_plan: catalog::default_plan(),
            email: String::new(),
            method: PaymentMethod::Btc,
            chain: None,
            address: None,
            locked_amount: None,
            step: Step::Select,
            pay_secs_remaining: 0,
            status_message: None,
            status_index: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn selected_plan(&self) -> &Plan {
        &self.selected_plan
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn chain(&self) -> Option<Chain> {
        self.chain
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn locked_amount(&self) -> Option<Decimal> {
        self.locked_amount
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn pay_secs_remaining(&self) -> u32 {
        self.pay_secs_remaining
    }

    pub fn status_message(&self) -> Option<&'static str> {
        self.status_message
    }

    /// The email field is read-only while an address is shown.
    pub fn email_locked(&self) -> bool {
        self.step == Step::Pay
    }

    /// Whether the countdown still has time left.
    pub fn is_counting(&self) -> bool {
        self.step == Step::Pay && self.pay_secs_remaining > 0
    }

    fn require_select(&self) -> Result<(), CheckoutError> {
        if self.step != Step::Select {
            return Err(CheckoutError::WrongStep {
                expected: Step::Select,
                actual: self.step,
            });
        }
        Ok(())
    }

    pub fn select_plan(&mut self, plan_id: &str) -> Result<(), CheckoutError> {
        self.require_select()?;
        let plan = catalog::find_plan(plan_id)
            .ok_or_else(|| CheckoutError::UnknownPlan(plan_id.to_owned()))?;
        self.selected_plan = plan;
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), CheckoutError> {
        if self.email_locked() {
            return Err(CheckoutError::EmailLocked);
        }
        self.email = email.into();
        Ok(())
    }

    /// Switch asset. A chain the new asset does not support is cleared.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.require_select()?;
        self.method = method;
        if self.chain.is_some_and(|c| !method.supports_chain(c)) {
            self.chain = None;
        }
        Ok(())
    }

    pub fn select_chain(&mut self, chain: Chain) -> Result<(), CheckoutError> {
        self.require_select()?;
        if !self.method.supports_chain(chain) {
            return Err(CheckoutError::UnsupportedChain {
                method: self.method,
                chain,
            });
        }
        self.chain = Some(chain);
        Ok(())
    }

    /// Amount the buyer would pay with the current selection.
    pub fn preview_amount(&self, prices: &PriceTable) -> Option<Decimal> {
        catalog::preview_amount(&self.selected_plan, self.method, prices.usd(self.method))
    }

    /// Check every guard on the generate action.
    ///
    /// Returns the amount that would be locked.
    pub fn validate_generate(&self, prices: &PriceTable) -> Result<Decimal, CheckoutError> {
        self.require_select()?;
        if !is_valid_email(self.email.trim()) {
            return Err(CheckoutError::InvalidEmail);
        }
        if self.method.requires_chain() && self.chain.is_none() {
            return Err(CheckoutError::ChainRequired(self.method));
        }
        self.preview_amount(prices)
            .ok_or(CheckoutError::PriceUnavailable(self.method))
    }

    /// `select → pay`.
    pub fn begin_payment(&mut self, address: String, amount: Decimal) -> Result<(), CheckoutError> {
        self.require_select()?;
        self.address = Some(address);
        self.locked_amount = Some(amount);
        self.step = Step::Pay;
        self.pay_secs_remaining = PAY_WINDOW_SECS;
        self.status_index = 0;
        self.status_message = STATUS_MESSAGES.first().copied();
        Ok(())
    }

    pub fn tick_countdown(&mut self) -> Countdown {
        if !self.is_counting() {
            return Countdown::Halted;
        }
        self.pay_secs_remaining -= 1;
        if self.pay_secs_remaining == 0 {
            self.status_message = Some(EXPIRED_MESSAGE);
            return Countdown::Expired;
        }
        Countdown::Running(self.pay_secs_remaining)
    }

    /// Advance to the next waiting message. No-op once expired.
    pub fn rotate_status(&mut self) -> bool {
        if !self.is_counting() || STATUS_MESSAGES.is_empty() {
            return false;
        }
        self.status_index = (self.status_index + 1) % STATUS_MESSAGES.len();
        self.status_message = STATUS_MESSAGES.get(self.status_index).copied();
        true
    }

    /// `pay → select`, clearing everything derived from the payment.
    ///
    /// Plan, method, chain and email are kept.
    pub fn reset(&mut self) {
        self.address = None;
        self.locked_amount = None;
        self.status_message = None;
        self.status_index = 0;
        self.pay_secs_remaining = 0;
        self.step = Step::Select;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceTable {
        serde_json::from_str(r#"{"bitcoin":{"usd":40000},"ethereum":{"usd":2000}}"#).unwrap()
    }

    fn ready_session() -> CheckoutSession {
        let mut s = CheckoutSession::new();
        s.set_email("buyer@example.com").unwrap();
        s
    }

    #[test]
    fn test_select_plan_updates_preview() {
        let mut s = CheckoutSession::new();
        let before = s.preview_amount(&prices()).unwrap();
        s.select_plan("365d").unwrap();
        let after = s.preview_amount(&prices()).unwrap();
        assert_eq!(s.selected_plan().id, "365d");
        assert!(after > before);
        assert!(matches!(s.select_plan("lifetime"), Err(CheckoutError::UnknownPlan(_))));
    }

    #[test]
    fn test_invalid_email_blocks_generate() {
        let mut s = CheckoutSession::new();
        s.set_email("not-an-email").unwrap();
        assert!(matches!(
            s.validate_generate(&prices()),
            Err(CheckoutError::InvalidEmail)
        ));
    }

    #[test]
    fn test_chain_required_blocks_generate() {
        let mut s = ready_session();
        s.select_method(PaymentMethod::Usdt).unwrap();
        assert!(matches!(
            s.validate_generate(&prices()),
            Err(CheckoutError::ChainRequired(PaymentMethod::Usdt))
        ));
        s.select_chain(Chain::Tron).unwrap();
        assert_eq!(s.validate_generate(&prices()).unwrap(), Decimal::new(1499, 2));
    }

    #[test]
    fn test_missing_price_blocks_generate() {
        let mut s = ready_session();
        s.select_method(PaymentMethod::Xmr).unwrap();
        assert!(matches!(
            s.validate_generate(&prices()),
            Err(CheckoutError::PriceUnavailable(PaymentMethod::Xmr))
        ));
    }

    #[test]
    fn test_method_switch_drops_unsupported_chain() {
        let mut s = ready_session();
        s.select_method(PaymentMethod::Usdt).unwrap();
        s.select_chain(Chain::Tron).unwrap();
        s.select_method(PaymentMethod::Usdc).unwrap();
        assert_eq!(s.chain(), None);
        s.select_chain(Chain::Base).unwrap();
        s.select_method(PaymentMethod::Eth).unwrap();
        assert_eq!(s.chain(), Some(Chain::Base));
        assert!(matches!(
            s.select_chain(Chain::Tron),
            Err(CheckoutError::UnsupportedChain { .. })
        ));
    }

    #[test]
    fn test_begin_payment_locks_amount_and_email() {
        let mut s = ready_session();
        let amount = s.validate_generate(&prices()).unwrap();
        s.begin_payment("bc1qexample".into(), amount).unwrap();
        assert_eq!(s.step(), Step::Pay);
        assert_eq!(s.locked_amount(), Some(amount));
        assert_eq!(s.pay_secs_remaining(), PAY_WINDOW_SECS);
        assert_eq!(s.status_message(), Some(STATUS_MESSAGES[0]));
        assert!(s.email_locked());
        assert!(matches!(s.set_email("x@y.z"), Err(CheckoutError::EmailLocked)));
        assert!(matches!(
            s.select_method(PaymentMethod::Eth),
            Err(CheckoutError::WrongStep { .. })
        ));
    }

    #[test]
    fn test_countdown_expires_exactly_once() {
        let mut s = ready_session();
        s.begin_payment("addr".into(), Decimal::ONE).unwrap();
        let mut expired = 0;
        for _ in 0..PAY_WINDOW_SECS + 10 {
            if s.tick_countdown() == Countdown::Expired {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(s.pay_secs_remaining(), 0);
        assert_eq!(s.status_message(), Some(EXPIRED_MESSAGE));
        assert_eq!(s.step(), Step::Pay);
        assert!(!s.rotate_status());
        assert_eq!(s.status_message(), Some(EXPIRED_MESSAGE));
    }

    #[test]
    fn test_status_rotation_wraps() {
        let mut s = ready_session();
        s.begin_payment("addr".into(), Decimal::ONE).unwrap();
        for _ in 0..STATUS_MESSAGES.len() {
            assert!(s.rotate_status());
        }
        assert_eq!(s.status_message(), Some(STATUS_MESSAGES[0]));
    }

    #[test]
    fn test_reset_clears_derived_fields() {
        let mut s = ready_session();
        s.select_plan("90d").unwrap();
        s.begin_payment("addr".into(), Decimal::ONE).unwrap();
        s.tick_countdown();
        s.reset();
        assert_eq!(s.step(), Step::Select);
        assert_eq!(s.address(), None);
        assert_eq!(s.locked_amount(), None);
        assert_eq!(s.status_message(), None);
        assert_eq!(s.pay_secs_remaining(), 0);
        assert!(!s.email_locked());
        assert_eq!(s.selected_plan().id, "90d");
        assert_eq!(s.email(), "buyer@example.com");
        assert_eq!(s.tick_countdown(), Countdown::Halted);
    }
}
