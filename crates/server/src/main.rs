mod auth;
mod config;
mod routes;

use std::net::SocketAddr;

use anyhow::Context;
use spritsit_core::Spritsit;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{AppState, router};

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    init_tracing(config.debug);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting spritsit-server");
    if config.remote.is_none() {
        info!("READABILITY_API_KEY not set, remote reader disabled");
    }

    let spritsit = Spritsit::new(config.pipeline()).context("Failed to set up the pipeline")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(spritsit, config));

    let listener = TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("Server error")?;
    Ok(())
}
