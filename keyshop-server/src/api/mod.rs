//! Storefront API.
//!
//! Called by the checkout page. Nothing here is authenticated and nothing
//! is persisted.
//!
//! # Endpoints
//!
//! - `GET /plans`            – static plan table
//! - `GET /methods`          – accepted assets and their networks
//! - `GET /address/rotating` – next address from a rotating pool
//! - `GET /address/random`   – random address from a pool
//! - `GET /price`            – upstream market-data pass-through

use axum::{Router, routing::get};

use crate::state::AppState;

mod address;
mod catalog;
mod price;

/// Build the storefront API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(catalog::list_plans))
        .route("/methods", get(catalog::list_methods))
        .route("/address/rotating", get(address::rotating_address))
        .route("/address/random", get(address::random_address))
        .route("/price", get(price::get_price))
}
