//! Blockchair Dashboard - blockchain statistics over the Blockchair API

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use blockchair_dashboard::{
    BlockchainApi, BlockchairClient, ErrorKind, Result,
    cli::{ChainArgs, Cli, Command, OutputFormat},
    config::Config,
    dashboard::{ChainCard, Dashboard, Slot, render, slot_error},
    server::DashboardServer,
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Some(command) => run_command(command, config).await,
        None => run_server(config, None, None).await,
    }
}

/// Run a subcommand
async fn run_command(command: Command, config: Config) -> ExitCode {
    match execute(command, config).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            report_failure(e.kind())
        }
    }
}

async fn execute(command: Command, config: Config) -> Result<ExitCode> {
    let default_chain = config.dashboard.chain.clone();
    let chain_of = |target: &ChainArgs| {
        target
            .chain
            .clone()
            .unwrap_or_else(|| default_chain.clone())
    };

    match command {
        Command::Serve { port, host } => Ok(run_server(config, port, host).await),

        Command::Stats { output } => run_stats(&config, output.format).await,

        Command::Chain { target, output } => {
            let chain = chain_of(&target);
            let stats = BlockchairClient::new(&config.api)?
                .chain_stats(&chain)
                .await?;
            Ok(match output.format {
                OutputFormat::Json => print_json(&stats),
                OutputFormat::Text => {
                    let card = ChainCard::new(&chain, &stats, chrono::Utc::now());
                    print!("{}", render::render_cards(&[card]));
                    ExitCode::SUCCESS
                }
            })
        }

        Command::Recent { limit, target, output } => {
            let chain = chain_of(&target);
            let limit = limit.unwrap_or(config.dashboard.recent_limit);
            let transactions = BlockchairClient::new(&config.api)?
                .recent_transactions(&chain, limit)
                .await?;
            Ok(match output.format {
                OutputFormat::Json => print_json(&transactions),
                OutputFormat::Text => {
                    print!("{}", render::render_transactions(&transactions));
                    ExitCode::SUCCESS
                }
            })
        }

        Command::Address { address, target } => {
            let chain = chain_of(&target);
            let record = BlockchairClient::new(&config.api)?
                .address(&chain, address.trim())
                .await?;
            Ok(print_json(&record))
        }

        Command::Tx { txid, target } => {
            let chain = chain_of(&target);
            let record = BlockchairClient::new(&config.api)?
                .transaction(&chain, txid.trim())
                .await?;
            Ok(print_json(&record))
        }
    }
}

/// Load general stats through the dashboard controller and print the cards
async fn run_stats(config: &Config, format: OutputFormat) -> Result<ExitCode> {
    let client = BlockchairClient::new(&config.api)?;
    let dashboard = Dashboard::new(Arc::new(client), config.dashboard.chain.clone());
    let view = dashboard.load_general_stats().await;
    if let Some(kind) = slot_error(&view, Slot::General) {
        return Ok(report_failure(kind));
    }

    let cards = dashboard.cards();
    Ok(match format {
        OutputFormat::Json => print_json(&cards),
        OutputFormat::Text => {
            print!("{}", render::render_cards(&cards));
            ExitCode::SUCCESS
        }
    })
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Failed to serialize to JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

fn report_failure(kind: ErrorKind) -> ExitCode {
    eprintln!("❌ {}", kind.message());
    ExitCode::FAILURE
}

/// Run the dashboard server
async fn run_server(mut config: Config, port: Option<u16>, host: Option<String>) -> ExitCode {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        chain = %config.dashboard.chain,
        "Starting Blockchair dashboard"
    );

    let server = match DashboardServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create server: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Dashboard shutdown complete");
    ExitCode::SUCCESS
}
