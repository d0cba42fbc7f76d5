//! Blockchair Dashboard Library
//!
//! Per-chain statistics, recent transactions, and address/transaction
//! lookups over the Blockchair aggregation API.
//!
//! # Layers
//!
//! - **Client**: authenticated GETs with a three-way error classification
//!   (configuration, authorization, transient)
//! - **Dashboard**: immutable view state, chain cards, display formatting
//! - **Server**: the dashboard view as an HTTP JSON API
//! - **CLI**: one-shot commands rendering to the terminal

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod server;

pub use blockchair_core::{ChainStats, StatsSnapshot, TransactionSummary};
pub use client::{BlockchainApi, BlockchairClient};
pub use error::{Error, ErrorKind, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {e}")))
}
