//! Market-data price table.
//!
//! `GET /api/price` passes the upstream `simple/price` body through
//! unchanged, so this type mirrors that shape:
//!
//! ```json
//! {"bitcoin":{"usd":64250.12},"monero":{"usd":161.3}}
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::methods::PaymentMethod;

/// Quote currency used throughout the storefront.
pub const QUOTE_CURRENCY: &str = "usd";

/// Prices keyed by market-data id, then by quote currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(pub HashMap<String, HashMap<String, f64>>);

impl PriceTable {
    /// USD price for `method`.
    ///
    /// Stablecoins are always quoted at 1. Returns `None` when the table has
    /// no usable (finite, positive) quote for the asset.
    pub fn usd(&self, method: PaymentMethod) -> Option<Decimal> {
        let Some(id) = method.price_id() else {
            return Some(Decimal::ONE);
        };
        let raw = *self.0.get(id)?.get(QUOTE_CURRENCY)?;
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }
        Decimal::try_from(raw).ok()
    }

    /// Comma-separated ids of every asset that needs a live quote.
    pub fn all_ids() -> String {
        PaymentMethod::ALL
            .iter()
            .filter_map(|m| m.price_id())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_lookup() {
        let table: PriceTable =
            serde_json::from_str(r#"{"bitcoin":{"usd":50000},"solana":{"usd":0}}"#).unwrap();
        assert_eq!(table.usd(PaymentMethod::Btc), Some(Decimal::from(50000)));
        assert_eq!(table.usd(PaymentMethod::Sol), None);
        assert_eq!(table.usd(PaymentMethod::Eth), None);
        assert_eq!(table.usd(PaymentMethod::Usdt), Some(Decimal::ONE));
    }

    #[test]
    fn test_all_ids() {
        assert_eq!(
            PriceTable::all_ids(),
            "bitcoin,ethereum,litecoin,solana,tron,monero"
        );
    }
}
