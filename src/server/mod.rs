//! Dashboard HTTP server

mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

pub use router::{AppState, LookupRequest, RecentParams, create_router};

use crate::client::{BlockchainApi, BlockchairClient};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::{Error, Result};

/// Dashboard server
pub struct DashboardServer {
    config: Config,
    state: Arc<AppState>,
}

impl DashboardServer {
    /// Create a server talking to the configured upstream
    pub fn new(config: Config) -> Result<Self> {
        let client = BlockchairClient::new(&config.api)?;
        if !client.has_credential() {
            warn!("No Blockchair API key configured; every request will fail until one is set");
        }
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Create a server over any [`BlockchainApi`]
    pub fn with_api(config: Config, api: Arc<dyn BlockchainApi>) -> Self {
        let dashboard = Arc::new(Dashboard::new(
            Arc::clone(&api),
            config.dashboard.chain.clone(),
        ));
        let state = Arc::new(AppState {
            dashboard,
            api,
            chain: config.dashboard.chain.clone(),
            recent_limit: config.dashboard.recent_limit,
        });
        Self { config, state }
    }

    /// Shared state, for embedding the router elsewhere
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );
        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("BLOCKCHAIR DASHBOARD v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(chain = %self.config.dashboard.chain, "Lookup chain");
        info!("  GET  http://{addr}/api/view");
        info!("  GET  http://{addr}/api/cards");
        info!("  POST http://{addr}/api/lookup/address");
        info!("  POST http://{addr}/api/lookup/transaction");
        info!("============================================================");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    ///
    /// General stats are loaded in the background as soon as serving starts.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let dashboard = Arc::clone(&self.state.dashboard);
        tokio::spawn(async move {
            dashboard.load_general_stats().await;
        });

        let app = create_router(Arc::clone(&self.state));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        info!("Dashboard server stopped");
        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
