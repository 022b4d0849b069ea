//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics before anything else logs
//! - Build the store client and bind the listener
//! - Start reload sources (file watcher, SIGHUP) and the shutdown trigger
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, GatewayConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::{shutdown_signal, spawn_reload_on_sighup};
use crate::observability::{logging, metrics};
use crate::upstream::ClientBuildError;

/// Employee gateway server.
#[derive(Debug, Parser)]
#[command(name = "employee-gateway", version, about)]
pub struct Args {
    /// TOML configuration file; built-in defaults are used when absent.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backing store client: {0}")]
    Client(#[from] ClientBuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load the configuration named by `args`, or the defaults.
pub fn resolve_config(args: &Args) -> Result<GatewayConfig, ConfigError> {
    match &args.config {
        Some(path) => load_config(path),
        None => Ok(GatewayConfig::default()),
    }
}

/// Run the gateway until a shutdown signal arrives.
pub async fn run(args: Args) -> Result<(), StartupError> {
    let config = resolve_config(&args)?;

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "employee-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        retry_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    // Dropping the watcher stops it; hold it until the server returns.
    let _watcher = match &args.config {
        Some(path) => {
            if let Err(e) = spawn_reload_on_sighup(path.clone(), update_tx.clone()) {
                tracing::warn!(error = %e, "SIGHUP reload unavailable");
            }
            match ConfigWatcher::new(path, update_tx.clone()).run() {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!(error = %e, "Config file watching unavailable");
                    None
                }
            }
        }
        None => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server
        .run(listener, update_rx, server_shutdown)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
