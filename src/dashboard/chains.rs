//! Per-chain display metadata

use serde::Serialize;

/// How a chain is presented on its card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainMeta {
    /// Human-readable name
    pub name: String,
    /// Ticker symbol, empty when unknown
    pub symbol: String,
    /// Short glyph standing in for the logo
    pub icon: String,
    /// Accent colour (CSS hex), if the chain has one
    pub color: Option<&'static str>,
}

/// (chain id, name, symbol, glyph, colour)
const KNOWN_CHAINS: &[(&str, &str, &str, &str, Option<&str>)] = &[
    ("bitcoin", "Bitcoin", "BTC", "₿", Some("#F7931A")),
    ("ethereum", "Ethereum", "ETH", "Ξ", Some("#627EEA")),
    ("bitcoin-cash", "Bitcoin Cash", "BCH", "₿", Some("#8DC351")),
    ("litecoin", "Litecoin", "LTC", "Ł", None),
    ("bitcoin-sv", "Bitcoin SV", "BSV", "₿", None),
    ("dogecoin", "Dogecoin", "DOGE", "Ð", None),
    ("dash", "Dash", "DASH", "Ð", None),
    ("ripple", "Ripple", "XRP", "XRP", None),
    ("groestlcoin", "Groestlcoin", "GRS", "G", None),
    ("stellar", "Stellar", "XLM", "XLM", None),
    ("monero", "Monero", "XMR", "XMR", None),
    ("cardano", "Cardano", "ADA", "₳", None),
    ("zcash", "Zcash", "ZEC", "ZEC", None),
    ("mixin", "Mixin", "XIN", "XIN", None),
];

/// Metadata for `chain`, falling back to a generic entry built from the id
pub fn chain_meta(chain: &str) -> ChainMeta {
    KNOWN_CHAINS
        .iter()
        .find(|(id, ..)| *id == chain)
        .map_or_else(
            || ChainMeta {
                name: chain.to_string(),
                symbol: String::new(),
                icon: fallback_icon(chain),
                color: None,
            },
            |(_, name, symbol, icon, color)| ChainMeta {
                name: (*name).to_string(),
                symbol: (*symbol).to_string(),
                icon: (*icon).to_string(),
                color: *color,
            },
        )
}

fn fallback_icon(chain: &str) -> String {
    chain
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
