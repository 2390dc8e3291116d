//! Static storefront catalog.
//!
//! The plan table and the method table are compiled in; nothing here is
//! configurable at runtime.

use keyshop_sdk::objects::{MethodInfo, PaymentMethod, Plan};
use rust_decimal::{Decimal, RoundingStrategy};

struct PlanRow {
    id: &'static str,
    label: &'static str,
    price_cents: i64,
    was_cents: Option<i64>,
    bandwidth: Option<&'static str>,
    note: Option<&'static str>,
}

const PLANS: &[PlanRow] = &[
    PlanRow {
        id: "30d",
        label: "30 days premium",
        price_cents: 1499,
        was_cents: None,
        bandwidth: Some("100 GB/day"),
        note: None,
    },
    PlanRow {
        id: "90d",
        label: "90 days premium",
        price_cents: 3699,
        was_cents: Some(4497),
        bandwidth: Some("100 GB/day"),
        note: None,
    },
    PlanRow {
        id: "180d",
        label: "180 days premium",
        price_cents: 6499,
        was_cents: Some(8994),
        bandwidth: Some("150 GB/day"),
        note: Some("Most popular"),
    },
    PlanRow {
        id: "365d",
        label: "365 days premium",
        price_cents: 10999,
        was_cents: Some(17988),
        bandwidth: Some("150 GB/day"),
        note: Some("Best value"),
    },
];

impl PlanRow {
    fn to_plan(&self) -> Plan {
        Plan {
            id: self.id.to_owned(),
            label: self.label.to_owned(),
            price_usd: Decimal::new(self.price_cents, 2),
            was_usd: self.was_cents.map(|c| Decimal::new(c, 2)),
            bandwidth: self.bandwidth.map(str::to_owned),
            note: self.note.map(str::to_owned),
        }
    }
}

/// All purchasable plans, in display order.
pub fn plans() -> Vec<Plan> {
    PLANS.iter().map(PlanRow::to_plan).collect()
}

/// Look up a plan by id.
pub fn find_plan(id: &str) -> Option<Plan> {
    PLANS.iter().find(|p| p.id == id).map(PlanRow::to_plan)
}

/// The plan a fresh checkout starts with.
pub fn default_plan() -> Plan {
    PLANS[0].to_plan()
}

/// All accepted payment methods, in display order.
pub fn methods() -> Vec<MethodInfo> {
    PaymentMethod::ALL.into_iter().map(MethodInfo::from).collect()
}

/// Amount of `method` to pay for `plan`.
///
/// Stablecoins are 1:1 with USD. Other methods divide the plan price by
/// `usd_price`; `None` if the price is missing or not positive.
pub fn preview_amount(
    plan: &Plan,
    method: PaymentMethod,
    usd_price: Option<Decimal>,
) -> Option<Decimal> {
    let dp = method.display_decimals();
    if method.is_stablecoin() {
        return Some(plan.price_usd.round_dp(dp));
    }
    let price = usd_price.filter(|p| p.is_sign_positive() && !p.is_zero())?;
    let amount = plan.price_usd.checked_div(price)?;
    Some(amount.round_dp_with_strategy(dp, RoundingStrategy::AwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_table() {
        let plans = plans();
        assert_eq!(plans.len(), 4);
        assert_eq!(plans[0].id, default_plan().id);
        assert_eq!(find_plan("90d").map(|p| p.price_usd), Some(Decimal::new(3699, 2)));
        assert!(find_plan("7d").is_none());
    }

    #[test]
    fn test_preview_stablecoin() {
        let plan = default_plan();
        let amount = preview_amount(&plan, PaymentMethod::Usdt, None);
        assert_eq!(amount, Some(Decimal::new(1499, 2)));
    }

    #[test]
    fn test_preview_live_price() {
        let plan = find_plan("365d").unwrap();
        let amount = preview_amount(&plan, PaymentMethod::Btc, Some(Decimal::from(50000)));
        // 109.99 / 50000 = 0.0021998
        assert_eq!(amount, Some(Decimal::new(219980, 8)));

        let amount = preview_amount(&plan, PaymentMethod::Sol, Some(Decimal::from(3)));
        // 36.663333.. rounded up at 4 dp
        assert_eq!(amount, Some(Decimal::new(366634, 4)));
    }

    #[test]
    fn test_preview_missing_price() {
        let plan = default_plan();
        assert_eq!(preview_amount(&plan, PaymentMethod::Eth, None), None);
        assert_eq!(
            preview_amount(&plan, PaymentMethod::Eth, Some(Decimal::ZERO)),
            None
        );
    }
}
