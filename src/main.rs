//! tierkv - a two-tier key-value cache server
//!
//! Serves the store facade over HTTP and runs the expiry reaper in the
//! background.

mod api;
mod config;
mod error;
mod models;
mod store;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::ExpiryReaper;

/// Main entry point for the tierkv cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the store (in-memory L2 stand-in; a durable adapter plugs in
///    behind the same trait)
/// 4. Start the background expiry reaper
/// 5. Create the Axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tierkv=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tierkv cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: enabled={}, l1_max_bytes={}, l1_max_items={}, cleanup_interval={}s, port={}",
        config.enabled,
        config.l1_max_bytes,
        config.l1_max_items,
        config.cleanup_interval,
        config.server_port
    );

    let state = AppState::from_config(&config);
    info!("Store initialized");

    let mut reaper = ExpiryReaper::new(state.store.clone(), config.cleanup_interval);
    reaper.start();

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reaper))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the reaper so
/// its pending timer does not leak.
async fn shutdown_signal(mut reaper: ExpiryReaper) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    reaper.stop();
    warn!("Expiry reaper stopped");
}
