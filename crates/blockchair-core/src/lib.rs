//! Blockchair dashboard core data model
//!
//! Typed views over the payloads returned by the Blockchair aggregation API.
//! Every metric is optional: the upstream service omits fields per chain and
//! the presentation layer renders placeholders for whatever is missing.

mod de;
pub mod stats;
pub mod transaction;

pub use stats::{ChainStats, StatsSnapshot};
pub use transaction::TransactionSummary;
