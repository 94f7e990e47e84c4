use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use geo_data_master::api::{create_router, AppState};
use geo_data_master::{Config, Result};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<()> {
    let config = Config::from_env()?;
    let state = AppState::new(&config)?;

    if !state.dem.has_api_key() {
        tracing::warn!("OPENTOPOGRAPHY_API_KEY is not set; /api/dem will reject requests");
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_address).await?;

    tracing::info!(address = %config.listen_address, "geo-data-master API listening");
    tracing::info!("  GET  /api/health");
    tracing::info!("  GET  /api/aoi?latitude=<lat>&longitude=<lon>&shape=<rectangle|circle>");
    tracing::info!("  GET  /api/aoi/geojson");
    tracing::info!("  GET  /api/geocode?q=<place>");
    tracing::info!("  GET  /api/datasets");
    tracing::info!("  GET  /api/dem?...&dataset=<code>&fallback=<bool>");
    tracing::info!("  POST /api/batch (multipart/form-data: csv)");

    axum::serve(listener, app).await?;
    Ok(())
}
