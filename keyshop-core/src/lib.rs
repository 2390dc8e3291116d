#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod address_book;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod market_data;
pub mod processors;
