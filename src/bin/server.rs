use caselabel::config::ServerConfig;
use caselabel::utils::{logger, validation::Validate};
use caselabel::{build_router, AppState, DiscogsClient, HttpArtworkSource};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse().resolve()?;

    logger::init_server_logger();

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if config.token.is_none() {
        tracing::warn!("No Discogs token configured; the API may rate-limit requests");
    }

    let client = DiscogsClient::with_base_url(
        config.base_url.clone(),
        config.token.clone(),
        config.timeout_seconds,
    )?;
    let state = AppState::new(
        Arc::new(client),
        Arc::new(HttpArtworkSource::new()?),
        config.options.clone(),
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;

    tracing::info!("caselabel server listening on {}", config.bind);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /");
    tracing::info!("  - GET|POST /generate-label");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}
