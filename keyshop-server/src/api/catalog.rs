use axum::{Json, response::IntoResponse};
use keyshop_core::catalog;

/// `GET /plans`: the static plan table, in display order.
pub(super) async fn list_plans() -> impl IntoResponse {
    Json(catalog::plans())
}

/// `GET /methods`: accepted assets, whether each needs a chain and a live
/// price, and the chains it can be sent on.
pub(super) async fn list_methods() -> impl IntoResponse {
    Json(catalog::methods())
}
