use serde::{Deserialize, Serialize};

use crate::batch::BatchFailure;
use crate::cache::CacheStats;
use crate::error::{Error, Result};
use crate::geometry::{Aoi, CircleFidelity};
use crate::types::{CenterPoint, ShapeKind, ShapeRequest};

fn default_side_km() -> f64 {
    10.0
}

fn default_radius_km() -> f64 {
    5.0
}

/// Query string describing an AOI; defaults mirror a 10 km square
#[derive(Debug, Deserialize)]
pub struct AoiQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default = "default_side_km")]
    pub width_km: f64,
    #[serde(default = "default_side_km")]
    pub height_km: f64,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fidelity: CircleFidelity,
}

impl AoiQuery {
    pub fn to_request(&self) -> Result<(CenterPoint, ShapeRequest)> {
        to_request(
            self.latitude,
            self.longitude,
            self.shape,
            self.width_km,
            self.height_km,
            self.radius_km,
        )
    }
}

/// Same fields as [`AoiQuery`] plus the dataset choice
#[derive(Debug, Deserialize)]
pub struct DemQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default = "default_side_km")]
    pub width_km: f64,
    #[serde(default = "default_side_km")]
    pub height_km: f64,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
    /// Try further datasets when the chosen one has no data
    #[serde(default)]
    pub fallback: bool,
}

impl DemQuery {
    pub fn to_request(&self) -> Result<(CenterPoint, ShapeRequest)> {
        to_request(
            self.latitude,
            self.longitude,
            self.shape,
            self.width_km,
            self.height_km,
            self.radius_km,
        )
    }
}

fn to_request(
    latitude: f64,
    longitude: f64,
    shape: ShapeKind,
    width_km: f64,
    height_km: f64,
    radius_km: f64,
) -> Result<(CenterPoint, ShapeRequest)> {
    let center = CenterPoint::validated(latitude, longitude)?;
    let shape = match shape {
        ShapeKind::Rectangle => ShapeRequest::rectangle(width_km, height_km),
        ShapeKind::Circle => ShapeRequest::circle(radius_km),
    };
    shape.validate()?;
    Ok((center, shape))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AoiResponse {
    pub name: String,
    pub label: String,
    pub shape: ShapeKind,
    /// `[lon, lat]`
    pub center: [f64; 2],
    /// Closed ring of `[lon, lat]` pairs
    pub polygon: Vec<[f64; 2]>,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: [f64; 4],
    /// Box as sent to the raster provider
    pub raster_bbox: [f64; 4],
    pub crosses_antimeridian: bool,
    pub area_km2: f64,
    pub geojson_file_name: String,
    pub dem_file_name: String,
}

impl AoiResponse {
    pub fn new(aoi: &Aoi, name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: aoi.label.to_string(),
            shape: aoi.shape.kind(),
            center: [aoi.center.longitude, aoi.center.latitude],
            polygon: aoi.ring().into_iter().map(|(x, y)| [x, y]).collect(),
            bbox: aoi.bbox.to_array(),
            raster_bbox: aoi.raster_bbox().to_array(),
            crosses_antimeridian: aoi.bbox.crosses_antimeridian(),
            area_km2: aoi.bbox.area_km2(),
            geojson_file_name: crate::export::geojson_file_name(name, &aoi.label),
            dem_file_name: crate::export::dem_file_name(name, &aoi.label),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub code: String,
    pub description: String,
    pub resolution_m: u32,
    pub max_area_km2: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total_rows: usize,
    pub successful: usize,
    pub failed: usize,
    pub execution_time_ms: f64,
    pub failures: Vec<BatchFailure>,
    pub feature_collection: geojson::FeatureCollection,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub api_key_configured: bool,
    pub dem_cache: CacheStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remedy: Option<String>,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            remedy: err.remedy().map(str::to_string),
        }
    }
}
