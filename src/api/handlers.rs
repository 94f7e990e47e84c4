use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;

use super::models::*;
use super::AppState;
use crate::batch::generate_batch;
use crate::dem::{Dataset, DEFAULT_FALLBACK};
use crate::error::Error;
use crate::export::{
    content_disposition, dem_file_name, geojson_file_name, to_geojson_string, GEOJSON_MEDIA_TYPE,
    TIFF_MEDIA_TYPE,
};
use crate::geocode::Place;
use crate::geometry::{generate, generate_with};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps a crate error to an HTTP status and JSON body
pub fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::InvalidInput(_) | Error::Csv(_) => StatusCode::BAD_REQUEST,
        Error::CrossesAntimeridian { .. } | Error::AreaTooLarge { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::MissingApiKey | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::NoCoverage { .. } => StatusCode::NOT_FOUND,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Http(_)
        | Error::HttpStatus { .. }
        | Error::Provider(_)
        | Error::Rejected(_)
        | Error::Geocode(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), error = %err, "request failed");
    } else {
        tracing::debug!(status = status.as_u16(), error = %err, "request rejected");
    }

    (status, Json(ErrorResponse::from(&err)))
}

fn display_name(name: &Option<String>) -> String {
    name.as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("aoi")
        .to_string()
}

pub async fn get_aoi(Query(req): Query<AoiQuery>) -> Result<Json<AoiResponse>, ApiError> {
    let (center, shape) = req.to_request().map_err(error_response)?;
    let aoi = generate_with(center, &shape, req.fidelity);

    Ok(Json(AoiResponse::new(&aoi, &display_name(&req.name))))
}

pub async fn download_geojson(Query(req): Query<AoiQuery>) -> Result<Response, ApiError> {
    let (center, shape) = req.to_request().map_err(error_response)?;
    let aoi = generate_with(center, &shape, req.fidelity);
    let name = display_name(&req.name);

    let body = to_geojson_string(&aoi, &name).map_err(error_response)?;
    let file_name = geojson_file_name(&name, &aoi.label);

    Ok((
        [
            (header::CONTENT_TYPE, GEOJSON_MEDIA_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        body,
    )
        .into_response())
}

pub async fn geocode(
    State(state): State<AppState>,
    Query(req): Query<GeocodeQuery>,
) -> Result<Json<Place>, ApiError> {
    match state.geocoder.lookup(&req.q).await.map_err(error_response)? {
        Some(place) => Ok(Json(place)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No place found for '{}'", req.q.trim()),
                remedy: Some("Try a more specific place name or enter coordinates directly".to_string()),
            }),
        )),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        api_key_configured: state.dem.has_api_key(),
        dem_cache: state.dem.cache().stats(),
    })
}

pub async fn list_datasets() -> Json<Vec<DatasetInfo>> {
    Json(
        Dataset::ALL
            .iter()
            .map(|d| DatasetInfo {
                code: d.code().to_string(),
                description: d.description().to_string(),
                resolution_m: d.resolution_m(),
                max_area_km2: d.max_area_km2(),
            })
            .collect(),
    )
}

pub async fn download_dem(
    State(state): State<AppState>,
    Query(req): Query<DemQuery>,
) -> Result<Response, ApiError> {
    let (center, shape) = req.to_request().map_err(error_response)?;
    let dataset = match req.dataset.as_deref() {
        Some(code) => code.parse::<Dataset>().map_err(error_response)?,
        None => Dataset::default(),
    };

    let aoi = generate(center, &shape);
    let name = display_name(&req.name);

    let fetched = if req.fallback {
        let mut order = vec![dataset];
        order.extend(DEFAULT_FALLBACK.iter().copied().filter(|d| *d != dataset));
        state.dem.fetch_with_fallback(&aoi.bbox, &order).await
    } else {
        state.dem.fetch(&aoi.bbox, dataset).await
    };
    let raster = fetched.map_err(error_response)?;

    let file_name = dem_file_name(&name, &aoi.label);

    Ok((
        [
            (header::CONTENT_TYPE, TIFF_MEDIA_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
            (
                header::HeaderName::from_static("x-dem-dataset"),
                raster.dataset.code().to_string(),
            ),
        ],
        raster.bytes,
    )
        .into_response())
}

pub async fn upload_batch(mut multipart: Multipart) -> Result<Json<BatchResponse>, ApiError> {
    let start = Instant::now();

    let mut csv_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error_response(Error::InvalidInput(format!("malformed upload: {}", e))))?
    {
        if field.name() == Some("csv") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| error_response(Error::InvalidInput(format!("unreadable CSV: {}", e))))?;
            csv_data = Some(bytes.to_vec());
        }
    }

    let csv_data = csv_data
        .ok_or_else(|| error_response(Error::InvalidInput("Missing CSV file".to_string())))?;

    let outcome = tokio::task::spawn_blocking(move || generate_batch(&csv_data))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("batch worker failed: {}", e),
                    remedy: None,
                }),
            )
        })?
        .map_err(error_response)?;

    let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(Json(BatchResponse {
        total_rows: outcome.total,
        successful: outcome.successful(),
        failed: outcome.failures.len(),
        execution_time_ms,
        failures: outcome.failures,
        feature_collection: outcome.collection,
    }))
}
