mod app;
mod bootstrap;
mod cli;
mod error;
mod handlers;
mod model;
mod state;
mod telemetry;

use crate::app::App;
use crate::cli::CLI;
use crate::state::AppState;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        generator = %config.generator,
        max_attempts = config.max_attempts,
        "starting tinylink gateway"
    );

    let shortener = bootstrap::build_shortener(&config).await?;
    let shutdown = CancellationToken::new();
    let state = AppState::new(shortener, config.base_url.clone(), shutdown.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("gateway stopped");
    Ok(())
}

/// Resolves on Ctrl-C and cancels every in-flight request.
async fn shutdown_signal(shutdown: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!(error = %e, "failed to listen for Ctrl-C, shutting down"),
    }
    shutdown.cancel();
}
