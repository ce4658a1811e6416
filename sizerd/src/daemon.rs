//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together:
//! - Calculator session (inputs + results)
//! - Price feed (spot quotes)
//! - API Server (HTTP endpoints)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Initialize session and price feed
//! 3. Probe the price feed (failures are logged, not fatal)
//! 4. Start API server
//! 5. Wait for SIGINT, then shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use rust_decimal_macros::dec;
use sizer_connectors::{CoinGeckoClient, PriceFeed, StubPriceFeed};

use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::session::CalculatorSession;

// =============================================================================
// Daemon
// =============================================================================

/// The main sizer daemon.
pub struct Daemon<F: PriceFeed + 'static> {
    /// Configuration
    config: Config,
    /// Calculator session
    session: Arc<RwLock<CalculatorSession>>,
    /// Price feed
    feed: Arc<F>,
}

impl Daemon<StubPriceFeed> {
    /// Create a new daemon with the stub price feed (for testing/development).
    pub fn new_stub(config: Config) -> Self {
        let feed = Arc::new(StubPriceFeed::new(dec!(100)));
        Self::new(config, feed)
    }
}

impl Daemon<CoinGeckoClient> {
    /// Create a new daemon backed by the CoinGecko REST API.
    pub fn new_live(config: Config) -> Self {
        let feed = Arc::new(CoinGeckoClient::with_config(
            config.feed.base_url.clone(),
            config.feed.vs_currency.clone(),
            config.feed.timeout,
        ));
        Self::new(config, feed)
    }
}

impl<F: PriceFeed + 'static> Daemon<F> {
    /// Create a new daemon with a provided price feed.
    pub fn new(config: Config, feed: Arc<F>) -> Self {
        let session = Arc::new(RwLock::new(CalculatorSession::new(config.initial_inputs())));
        Self {
            config,
            session,
            feed,
        }
    }

    /// Shared handle to the calculator session.
    pub fn session(&self) -> Arc<RwLock<CalculatorSession>> {
        self.session.clone()
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            "Starting sizer daemon"
        );

        // 1. Probe the price feed
        self.probe_feed().await;

        // 2. Start API server
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (api_addr, server) = self.start_api_server(shutdown_rx).await?;
        info!(%api_addr, "API server started");

        // 3. Wait for shutdown
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");

        // 4. Graceful shutdown
        let _ = shutdown_tx.send(());
        if let Err(e) = server.await {
            error!(error = %e, "API server task failed");
        }
        self.shutdown().await;

        Ok(())
    }

    /// Check the price feed is reachable. Only logs on failure.
    async fn probe_feed(&self) {
        match self.feed.health_check().await {
            Ok(()) => info!("Price feed reachable"),
            Err(e) => warn!(error = %e, "Price feed unreachable, quotes will fail until it recovers"),
        }
    }

    /// Start the API server.
    ///
    /// The server stops accepting connections once `shutdown` resolves. The
    /// returned handle completes after in-flight requests have drained.
    async fn start_api_server(
        &self,
        shutdown: oneshot::Receiver<()>,
    ) -> DaemonResult<(SocketAddr, JoinHandle<()>)> {
        let state = Arc::new(ApiState {
            session: self.session.clone(),
            feed: self.feed.clone(),
        });

        let router = create_router(state);
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DaemonError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| DaemonError::Config(format!("Failed to get local address: {}", e)))?;

        // Spawn the server task
        let server = tokio::spawn(async move {
            let graceful = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown.await;
            });
            if let Err(e) = graceful.await {
                error!(error = %e, "API server error");
            }
        });

        Ok((local_addr, server))
    }

    /// Graceful shutdown.
    async fn shutdown(&self) {
        let session = self.session.read().await;
        info!(
            entry_price = %session.inputs().entry_price,
            position_size = %session.results().position_size,
            "Shutdown complete"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
