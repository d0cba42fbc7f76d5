//! Chain summary cards

use blockchair_core::{ChainStats, StatsSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::chains::{ChainMeta, chain_meta};
use super::format::{NOT_AVAILABLE, block_age, format_number, format_percentage, format_usd};

/// Display-ready summary of one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainCard {
    /// Chain id as used by the upstream
    pub chain: String,
    /// Presentation metadata
    pub meta: ChainMeta,
    /// Market price in USD; a zero price reads as unknown
    pub price: String,
    /// 24h price change
    pub price_change_24h: String,
    /// Market capitalisation in USD
    pub market_cap: String,
    /// Latest block height; zero reads as unknown
    pub latest_block: String,
    /// Age of the best block, when known
    pub block_age: Option<String>,
    /// Mempool size
    pub mempool: String,
    /// Average fee; the stats endpoint does not report one
    pub average_fee: String,
}

impl ChainCard {
    /// Build the card for `chain`
    pub fn new(chain: &str, stats: &ChainStats, now: DateTime<Utc>) -> Self {
        Self {
            chain: chain.to_string(),
            meta: chain_meta(chain),
            price: format_usd(stats.market_price_usd.filter(|p| p.abs() > 0.0)),
            price_change_24h: format_percentage(stats.market_price_usd_change_24h_percentage),
            market_cap: format_usd(stats.market_cap_usd),
            latest_block: format_number(stats.blocks.filter(|b| *b != 0)),
            block_age: block_age(stats.best_block_time.as_deref(), now),
            mempool: format_number(stats.mempool_transactions),
            average_fee: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Cards for every chain with decoded stats, ordered by chain id
pub fn cards(snapshot: &StatsSnapshot, now: DateTime<Utc>) -> Vec<ChainCard> {
    snapshot
        .present()
        .map(|(chain, stats)| ChainCard::new(chain, stats, now))
        .collect()
}
