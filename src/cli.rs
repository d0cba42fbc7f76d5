//! Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Blockchain statistics dashboard backed by the Blockchair API
#[derive(Parser, Debug)]
#[command(name = "blockchair-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "BLOCKCHAIR_DASHBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "warn",
        env = "BLOCKCHAIR_DASHBOARD_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "BLOCKCHAIR_DASHBOARD_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "BLOCKCHAIR_DASHBOARD_PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "BLOCKCHAIR_DASHBOARD_HOST")]
        host: Option<String>,
    },

    /// Show statistics cards for every chain
    Stats {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show raw statistics for one chain
    Chain {
        #[command(flatten)]
        target: ChainArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the latest transactions of a chain
    Recent {
        /// Number of transactions to request
        #[arg(short, long)]
        limit: Option<u32>,

        #[command(flatten)]
        target: ChainArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Look up an address
    Address {
        /// Address to look up
        #[arg(required = true)]
        address: String,

        #[command(flatten)]
        target: ChainArgs,
    },

    /// Look up a transaction
    Tx {
        /// Transaction id (hash)
        #[arg(required = true)]
        txid: String,

        #[command(flatten)]
        target: ChainArgs,
    },
}

/// Chain selection
#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Chain id (defaults to `dashboard.chain` from config)
    #[arg(long)]
    pub chain: Option<String>,
}

/// Output selection
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output formats for one-shot commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}
