//! Recent-transaction rows

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of `/{chain}/transactions`.
///
/// Field sets differ between UTXO and account chains; the UTXO fields are
/// typed and everything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Containing block, `-1` while in the mempool
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_id: Option<i64>,
    /// Internal Blockchair id
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    /// Transaction hash
    #[serde(
        default,
        deserialize_with = "crate::de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub hash: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS` in UTC
    #[serde(
        default,
        deserialize_with = "crate::de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    /// Serialized size in bytes
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,
    /// Fee in the chain's smallest unit
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee: Option<f64>,
    /// Fee in USD
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_usd: Option<f64>,
    /// Sum of inputs in the chain's smallest unit
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_total: Option<f64>,
    /// Sum of inputs in USD
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_total_usd: Option<f64>,
    /// Sum of outputs in the chain's smallest unit
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_total: Option<f64>,
    /// Sum of outputs in USD
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_total_usd: Option<f64>,
    /// Whether this is the block reward transaction
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_coinbase: Option<bool>,
    /// Chain-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionSummary {
    /// True when the transaction has not been mined yet.
    pub fn is_pending(&self) -> bool {
        self.block_id.is_some_and(|id| id < 0)
    }
}
