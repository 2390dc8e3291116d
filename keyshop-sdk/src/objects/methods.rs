use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All networks a multi-chain asset can be sent on
pub enum Chain {
    #[serde(rename = "eth")]
    Ethereum,
    #[serde(rename = "arb")]
    ArbitrumOne,
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "op")]
    Optimism,
    #[serde(rename = "polygon")]
    Polygon,
    #[serde(rename = "bsc")]
    Bsc,
    #[serde(rename = "tron")]
    Tron,
    #[serde(rename = "sol")]
    Solana,
}

impl Chain {
    /// The short wire name used in query strings and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "eth",
            Chain::ArbitrumOne => "arb",
            Chain::Base => "base",
            Chain::Optimism => "op",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
            Chain::Tron => "tron",
            Chain::Solana => "sol",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All assets accepted as payment
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Btc,
    Eth,
    Ltc,
    Sol,
    Trx,
    Xmr,
    Usdt,
    Usdc,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 8] = [
        PaymentMethod::Btc,
        PaymentMethod::Eth,
        PaymentMethod::Ltc,
        PaymentMethod::Sol,
        PaymentMethod::Trx,
        PaymentMethod::Xmr,
        PaymentMethod::Usdt,
        PaymentMethod::Usdc,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            PaymentMethod::Btc => "BTC",
            PaymentMethod::Eth => "ETH",
            PaymentMethod::Ltc => "LTC",
            PaymentMethod::Sol => "SOL",
            PaymentMethod::Trx => "TRX",
            PaymentMethod::Xmr => "XMR",
            PaymentMethod::Usdt => "USDT",
            PaymentMethod::Usdc => "USDC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Btc => "Bitcoin",
            PaymentMethod::Eth => "Ether",
            PaymentMethod::Ltc => "Litecoin",
            PaymentMethod::Sol => "Solana",
            PaymentMethod::Trx => "Tron",
            PaymentMethod::Xmr => "Monero",
            PaymentMethod::Usdt => "Tether USD",
            PaymentMethod::Usdc => "USD Coin",
        }
    }

    /// Networks this asset can be received on.
    ///
    /// Empty for single-network assets.
    pub fn chains(&self) -> &'static [Chain] {
        match self {
            PaymentMethod::Eth => &[
                Chain::Ethereum,
                Chain::ArbitrumOne,
                Chain::Base,
                Chain::Optimism,
            ],
            PaymentMethod::Usdt => &[Chain::Ethereum, Chain::Tron, Chain::Bsc, Chain::Solana],
            PaymentMethod::Usdc => &[Chain::Ethereum, Chain::Base, Chain::Polygon, Chain::Solana],
            _ => &[],
        }
    }

    pub fn requires_chain(&self) -> bool {
        !self.chains().is_empty()
    }

    pub fn supports_chain(&self, chain: Chain) -> bool {
        self.chains().contains(&chain)
    }

    pub fn is_stablecoin(&self) -> bool {
        matches!(self, PaymentMethod::Usdt | PaymentMethod::Usdc)
    }

    /// Whether the payable amount depends on a live USD quote.
    pub fn needs_live_price(&self) -> bool {
        !self.is_stablecoin()
    }

    /// Market-data id used by the price API, `None` for stablecoins.
    pub fn price_id(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::Btc => Some("bitcoin"),
            PaymentMethod::Eth => Some("ethereum"),
            PaymentMethod::Ltc => Some("litecoin"),
            PaymentMethod::Sol => Some("solana"),
            PaymentMethod::Trx => Some("tron"),
            PaymentMethod::Xmr => Some("monero"),
            PaymentMethod::Usdt | PaymentMethod::Usdc => None,
        }
    }

    /// Decimal places shown for the payable amount.
    pub fn display_decimals(&self) -> u32 {
        match self {
            PaymentMethod::Btc => 8,
            PaymentMethod::Eth | PaymentMethod::Ltc | PaymentMethod::Xmr => 6,
            PaymentMethod::Sol => 4,
            PaymentMethod::Trx | PaymentMethod::Usdt | PaymentMethod::Usdc => 2,
        }
    }

    /// Which address endpoint serves this asset.
    pub fn address_strategy(&self) -> AddressStrategy {
        match self {
            PaymentMethod::Btc | PaymentMethod::Ltc | PaymentMethod::Xmr | PaymentMethod::Trx => {
                AddressStrategy::Rotating
            }
            PaymentMethod::Eth | PaymentMethod::Sol | PaymentMethod::Usdt | PaymentMethod::Usdc => {
                AddressStrategy::Random
            }
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How an address endpoint picks from its configured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressStrategy {
    /// Cycles through the list with an in-memory counter.
    Rotating,
    /// Picks uniformly at random.
    Random,
}

impl AddressStrategy {
    /// Route path of the endpoint serving this strategy.
    pub fn path(&self) -> &'static str {
        match self {
            AddressStrategy::Rotating => "/api/address/rotating",
            AddressStrategy::Random => "/api/address/random",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_requirement() {
        assert!(PaymentMethod::Eth.requires_chain());
        assert!(PaymentMethod::Usdt.requires_chain());
        assert!(PaymentMethod::Usdc.requires_chain());
        assert!(!PaymentMethod::Btc.requires_chain());
        assert!(!PaymentMethod::Xmr.requires_chain());
        assert!(PaymentMethod::Usdt.supports_chain(Chain::Tron));
        assert!(!PaymentMethod::Usdc.supports_chain(Chain::Tron));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::Usdt).unwrap();
        assert_eq!(json, "\"USDT\"");
        let chain: Chain = serde_json::from_str("\"arb\"").unwrap();
        assert_eq!(chain, Chain::ArbitrumOne);
        // Wire names are exact: query strings and config files agree.
        assert!(serde_json::from_str::<PaymentMethod>("\"usdc\"").is_err());
        assert!(serde_json::from_str::<Chain>("\"TRON\"").is_err());
        assert!(serde_json::from_str::<PaymentMethod>("\"DOGE\"").is_err());
    }

    #[test]
    fn test_live_price_ids() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.needs_live_price(), method.price_id().is_some());
        }
    }
}
