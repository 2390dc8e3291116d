//! Client-side processors used by the checkout flow.
//!
//! - `AddressRequester`: asks the storefront for a receiving address, falling
//!   back to a placeholder
//! - `PriceWatcher`: keeps a live price table fresh on an interval

pub mod address_requester;
pub mod price_watcher;

pub use address_requester::{
    AddressRequester, AddressSource, PLACEHOLDER_ADDRESS, RequestAddress,
};
pub use price_watcher::{DEFAULT_PRICE_INTERVAL, MIN_PRICE_INTERVAL, PriceSource, PriceWatcher};
