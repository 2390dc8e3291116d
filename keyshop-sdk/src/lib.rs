//! Keyshop SDK
//!
//! Wire types shared by the storefront server and its clients. Enable the
//! `client` feature for a typed HTTP client.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
