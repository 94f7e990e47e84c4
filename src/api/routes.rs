use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::*;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/aoi", get(get_aoi))
        .route("/api/aoi/geojson", get(download_geojson))
        .route("/api/geocode", get(geocode))
        .route("/api/datasets", get(list_datasets))
        .route("/api/dem", get(download_dem))
        .route("/api/batch", post(upload_batch))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB CSV limit
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
