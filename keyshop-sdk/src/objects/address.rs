//! Address endpoint request and response types.

use serde::{Deserialize, Serialize};

use super::methods::{Chain, PaymentMethod};

/// Query string accepted by both address endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressQuery {
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,
}

/// Response of `GET /api/address/{rotating,random}`.
///
/// `address` is `null` when no list is configured for the requested key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: Option<String>,
}
