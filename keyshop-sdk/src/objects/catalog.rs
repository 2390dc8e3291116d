//! Catalog types returned by `GET /api/plans` and `GET /api/methods`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::methods::{Chain, PaymentMethod};

/// A purchasable premium-key tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub label: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: Decimal,
    /// Crossed-out list price, if the tier is discounted.
    #[serde(rename = "wasUSD", default, skip_serializing_if = "Option::is_none")]
    pub was_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A payment method as advertised to the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInfo {
    pub method: PaymentMethod,
    pub label: String,
    pub requires_chain: bool,
    pub needs_live_price: bool,
    pub chains: Vec<Chain>,
}

impl From<PaymentMethod> for MethodInfo {
    fn from(method: PaymentMethod) -> Self {
        Self {
            method,
            label: method.label().to_owned(),
            requires_chain: method.requires_chain(),
            needs_live_price: method.needs_live_price(),
            chains: method.chains().to_vec(),
        }
    }
}
