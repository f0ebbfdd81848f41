mod analysis;
mod config;
mod errors;
mod routes;
mod runner;
mod state;
mod upload;

#[cfg(test)]
mod test_utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::runner::ProcessExecutor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config.clone(), Arc::new(ProcessExecutor));
    state.scratch.ensure().await?;
    info!("Scratch directory: {:?}", state.scratch.root());
    info!(
        "Scripts: {} {:?} (keyword), {:?} (tailor)",
        config.python_bin, config.keyword_script, config.tailor_script
    );
    match config.max_concurrent_scripts {
        Some(n) => info!("Script concurrency capped at {n}"),
        None => info!("Script concurrency unbounded"),
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
