//! Chain statistics and the multi-chain snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Statistics for a single chain, as served by `/{chain}/stats` and nested
/// under each chain of `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainStats {
    /// Number of blocks in the chain
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub blocks: Option<u64>,
    /// Number of transactions in the chain
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub transactions: Option<u64>,
    /// Coins in circulation, in the chain's smallest unit
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub circulation: Option<f64>,
    /// Blockchain size in bytes
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub blockchain_size: Option<u64>,
    /// Current mining difficulty
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<f64>,
    /// Hashrate over the last 24 hours (upstream sends a decimal string)
    #[serde(
        default,
        deserialize_with = "crate::de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub hashrate_24h: Option<String>,
    /// Height of the best block
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_block_height: Option<u64>,
    /// Hash of the best block
    #[serde(
        default,
        deserialize_with = "crate::de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_block_hash: Option<String>,
    /// Best block time, `YYYY-MM-DD HH:MM:SS` in UTC
    #[serde(
        default,
        deserialize_with = "crate::de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_block_time: Option<String>,
    /// Transactions waiting in the mempool
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub mempool_transactions: Option<u64>,
    /// Market price in USD
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_price_usd: Option<f64>,
    /// Market price in BTC
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_price_btc: Option<f64>,
    /// 24h USD price change, already expressed as a percentage
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_price_usd_change_24h_percentage: Option<f64>,
    /// Market capitalisation in USD
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_cap_usd: Option<f64>,
    /// Market dominance percentage
    #[serde(
        default,
        deserialize_with = "crate::de::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_dominance_percentage: Option<f64>,
    /// Every other metric the upstream reports
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Aggregated statistics across chains (`/stats`).
///
/// Each chain decodes on its own. A null entry or an entry without a `data`
/// object is kept as absent rather than failing the whole snapshot; inside
/// `data`, a field of an unexpected type is absent on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsSnapshot {
    chains: BTreeMap<String, Option<ChainStats>>,
}

impl StatsSnapshot {
    /// Build a snapshot from the raw `data` object of the `/stats` response.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let chains = entries
            .into_iter()
            .map(|(chain, entry)| {
                let stats = decode_entry(entry);
                (chain, stats)
            })
            .collect();
        Self { chains }
    }

    /// Stats for `chain`, if the chain is present and decoded.
    pub fn get(&self, chain: &str) -> Option<&ChainStats> {
        self.chains.get(chain).and_then(Option::as_ref)
    }

    /// Whether the upstream mentioned `chain` at all, decoded or not.
    pub fn contains(&self, chain: &str) -> bool {
        self.chains.contains_key(chain)
    }

    /// Chains with decoded stats, ordered by chain id.
    pub fn present(&self) -> impl Iterator<Item = (&str, &ChainStats)> {
        self.chains
            .iter()
            .filter_map(|(chain, stats)| stats.as_ref().map(|s| (chain.as_str(), s)))
    }

    /// Number of chain entries, absent ones included.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// True when the upstream returned no entries.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl FromIterator<(String, Option<ChainStats>)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Option<ChainStats>)>>(iter: I) -> Self {
        Self {
            chains: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for StatsSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_entries(raw))
    }
}

fn decode_entry(entry: Value) -> Option<ChainStats> {
    let Value::Object(mut outer) = entry else {
        return None;
    };
    match outer.remove("data")? {
        data @ Value::Object(_) => serde_json::from_value(data).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_tolerates_null_and_foreign_entries() {
        let snapshot: StatsSnapshot = serde_json::from_value(json!({
            "bitcoin": {"data": {"blocks": 800_000, "market_price_usd": 64_000.5}},
            "ethereum": null,
            "cross-chain": {"tether": {"data": {}}},
            "dogecoin": {"data": {"blocks": "not a number", "mempool_transactions": 42}},
            "dash": {"data": []}
        }))
        .unwrap();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.get("bitcoin").unwrap().blocks, Some(800_000));
        assert!(snapshot.contains("ethereum"));
        assert!(snapshot.get("ethereum").is_none());
        assert!(snapshot.get("cross-chain").is_none());
        assert!(snapshot.get("dash").is_none());

        let dogecoin = snapshot.get("dogecoin").unwrap();
        assert_eq!(dogecoin.blocks, None);
        assert_eq!(dogecoin.mempool_transactions, Some(42));
        assert_eq!(snapshot.present().count(), 2);
    }

    #[test]
    fn test_odd_field_types_only_blank_that_field() {
        let snapshot: StatsSnapshot = serde_json::from_value(json!({
            "bitcoin": {"data": {
                "blocks": 800_000,
                "market_price_usd": 64_000.5,
                "hashrate_24h": 123_456
            }},
            "litecoin": {"data": {
                "blocks": 2_700_000,
                "market_price_usd": "85.1",
                "best_block_time": {"unexpected": true}
            }}
        }))
        .unwrap();

        let bitcoin = snapshot.get("bitcoin").unwrap();
        assert_eq!(bitcoin.hashrate_24h.as_deref(), Some("123456"));
        assert_eq!(bitcoin.market_price_usd, Some(64_000.5));

        let litecoin = snapshot.get("litecoin").unwrap();
        assert_eq!(litecoin.blocks, Some(2_700_000));
        assert_eq!(litecoin.market_price_usd, Some(85.1));
        assert_eq!(litecoin.best_block_time, None);
    }

    #[test]
    fn test_chain_stats_keeps_unknown_metrics() {
        let stats: ChainStats = serde_json::from_value(json!({
            "blocks": 1,
            "circulation": 120_000_000_000_000_000_000_000_000.0_f64,
            "nodes": 7_000
        }))
        .unwrap();

        assert_eq!(stats.blocks, Some(1));
        assert!(stats.circulation.unwrap() > 1e26);
        assert_eq!(stats.extra.get("nodes"), Some(&json!(7_000)));
    }

    #[test]
    fn test_chain_stats_accepts_string_circulation() {
        let stats: ChainStats = serde_json::from_value(json!({
            "blocks": 19_000_000,
            "circulation": "120000000000000000000000000",
            "difficulty": 0
        }))
        .unwrap();

        assert_eq!(stats.circulation, Some(1.2e26));
        assert_eq!(stats.difficulty, Some(0.0));
    }

    #[test]
    fn test_snapshot_serializes_as_plain_map() {
        let snapshot: StatsSnapshot = [
            ("bitcoin".to_string(), Some(ChainStats { blocks: Some(5), ..Default::default() })),
            ("ethereum".to_string(), None),
        ]
        .into_iter()
        .collect();

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, json!({"bitcoin": {"blocks": 5}, "ethereum": null}));
    }
}
