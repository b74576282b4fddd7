//! autoindex - A lightweight directory index server
//!
//! Serves directory listings and file metadata as JSON through a TTL and
//! LRU bounded cache.

use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoindex::api::{create_router, AppState};
use autoindex::Config;

/// Upper bound on the time spent closing the index after the server stops.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory index server. Settings come from the environment.
#[derive(Parser, Debug)]
#[command(name = "autoindex", version, disable_version_flag = true)]
#[command(about = "Serves directory listings and file metadata as JSON")]
struct Args {
    /// Print version and exit
    #[allow(dead_code)]
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Validate the configuration and index root, then exit
    #[arg(short = 't', long = "check")]
    check: bool,
}

/// Main entry point for the directory index server.
///
/// # Startup Sequence
/// 1. Parse command line flags and load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the index, validating the root directory (`--check` stops here)
/// 4. Start the background reclaimer if configured
/// 5. Create Axum router and start the HTTP server
/// 6. Handle graceful shutdown on SIGINT/SIGTERM, then close the index
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env();

    // RUST_LOG wins over LOG_LEVEL when set
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.directive())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting autoindex");
    info!(
        "Configuration loaded: root={}, cache_ttl={}s, cache_max_size={}, cleanup_interval={}s, listen={}",
        config.root.display(),
        config.cache_ttl,
        config.cache_max_size,
        config.cleanup_interval,
        config.listen_addr()
    );

    let state = AppState::from_config(config.index_config()).context("Failed to create index")?;

    if args.check {
        info!("Configuration OK: root={}", state.index.root().display());
        return Ok(());
    }

    if let Some(interval) = config.cleanup_interval() {
        state.index.spawn_reclaimer(interval);
        info!("Background cache reclaimer started");
    }

    let app = create_router(state.clone());

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, state.index.close()).await {
        Ok(result) => result.context("Failed to close index")?,
        Err(_) => warn!("Index close timed out after {:?}", SHUTDOWN_TIMEOUT),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
