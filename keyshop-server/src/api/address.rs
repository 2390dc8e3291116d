use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use keyshop_core::address_book::{AddressPoolKey, PickAddress};
use keyshop_sdk::objects::{AddressQuery, AddressResponse, AddressStrategy};

use crate::state::AppState;

/// `GET /address/rotating`: next address of the pool, cycling in order.
///
/// The counter lives in memory and restarts at the first address whenever
/// the process restarts.
pub(super) async fn rotating_address(
    state: State<AppState>,
    Query(query): Query<AddressQuery>,
) -> impl IntoResponse {
    pick(&state, AddressStrategy::Rotating, query).await
}

/// `GET /address/random`: an address of the pool chosen uniformly.
pub(super) async fn random_address(
    state: State<AppState>,
    Query(query): Query<AddressQuery>,
) -> impl IntoResponse {
    pick(&state, AddressStrategy::Random, query).await
}

async fn pick(state: &AppState, strategy: AddressStrategy, query: AddressQuery) -> Json<AddressResponse> {
    let address = match state
        .addresses
        .process(PickAddress {
            strategy,
            key: AddressPoolKey::from(query),
        })
        .await
    {
        Ok(address) => address,
        Err(never) => match never {},
    };
    Json(AddressResponse { address })
}
