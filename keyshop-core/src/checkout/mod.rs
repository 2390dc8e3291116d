//! Client-side checkout flow.
//!
//! [`CheckoutSession`] is the pure state machine; [`CheckoutDriver`] wraps
//! it with the address request and the two payment timers.

mod driver;
mod email;
mod session;

pub use driver::{COUNTDOWN_PERIOD, CheckoutDriver, STATUS_ROTATION_PERIOD};
pub use email::is_valid_email;
pub use session::{
    CheckoutSession, Countdown, EXPIRED_MESSAGE, PAY_WINDOW_SECS, STATUS_MESSAGES, Step,
};

use keyshop_sdk::objects::{Chain, PaymentMethod};
use thiserror::Error;

/// Reasons a checkout action is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("action not allowed in step {actual:?}, expected {expected:?}")]
    WrongStep { expected: Step, actual: Step },

    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    #[error("email cannot be changed while a payment is open")]
    EmailLocked,

    #[error("{method} is not available on {chain}")]
    UnsupportedChain { method: PaymentMethod, chain: Chain },

    #[error("please enter a valid email address")]
    InvalidEmail,

    #[error("please choose a network for {0}")]
    ChainRequired(PaymentMethod),

    #[error("live price for {0} is not available yet")]
    PriceUnavailable(PaymentMethod),
}
