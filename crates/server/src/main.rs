//! HTTP server for the movie aggregator.
//!
//! Reads its settings from the environment (and `.env`), then serves
//! `GET /movies` over the configured upstreams.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::ServerConfig;
use server::api::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server=debug,upstream=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting movie aggregator server");

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    info!(
        index = %config.endpoints.index,
        details = %config.endpoints.details,
        cast = %config.endpoints.cast,
        "Upstreams configured"
    );
    if config.retry.is_unbounded() {
        warn!("Retry policy is unbounded: a down index or details service stalls requests");
    }

    let aggregator = config
        .aggregator()
        .context("Failed to build upstream client")?;
    let app = api::router(AppState::new(aggregator));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
