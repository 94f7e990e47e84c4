//! CSV batch generation of AOIs
//!
//! Each row names a center and a shape; rows are generated in parallel and
//! collected, in input order, into one GeoJSON FeatureCollection. A bad row
//! is reported and skipped rather than failing the whole batch.

use std::io::Cursor;

use geojson::FeatureCollection;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::to_feature;
use crate::geometry::generate;
use crate::types::{CenterPoint, ShapeKind, ShapeRequest};

/// Side length used when a rectangle row leaves it blank
pub const DEFAULT_SIDE_KM: f64 = 10.0;

/// Radius used when a circle row leaves it blank
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// One CSV row: `latitude,longitude[,shape,width_km,height_km,radius_km,name]`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub width_km: Option<f64>,
    #[serde(default)]
    pub height_km: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl BatchRow {
    /// Validated center and shape; a row with only a radius is a circle
    pub fn to_request(&self) -> Result<(CenterPoint, ShapeRequest)> {
        let center = CenterPoint::validated(self.latitude, self.longitude)?;

        let kind = match self.shape.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None if self.radius_km.is_some() && self.width_km.is_none() => ShapeKind::Circle,
            None => ShapeKind::Rectangle,
        };

        let shape = match kind {
            ShapeKind::Rectangle => ShapeRequest::rectangle(
                self.width_km.unwrap_or(DEFAULT_SIDE_KM),
                self.height_km.unwrap_or(DEFAULT_SIDE_KM),
            ),
            ShapeKind::Circle => ShapeRequest::circle(self.radius_km.unwrap_or(DEFAULT_RADIUS_KM)),
        };
        shape.validate()?;

        Ok((center, shape))
    }
}

/// A row that could not be turned into an AOI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub total: usize,
    pub collection: FeatureCollection,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn successful(&self) -> usize {
        self.collection.features.len()
    }
}

/// Parses `csv_data` and generates every valid row
pub fn generate_batch(csv_data: &[u8]) -> Result<BatchOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(csv_data));

    let headers = reader.headers()?.clone();
    for required in ["latitude", "longitude"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::InvalidInput(format!("CSV is missing a '{}' column", required)));
        }
    }

    let rows: Vec<(usize, std::result::Result<BatchRow, csv::Error>)> = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| (i + 1, row))
        .collect();
    let total = rows.len();

    let results: Vec<std::result::Result<geojson::Feature, BatchFailure>> = rows
        .into_par_iter()
        .map(|(row, parsed)| {
            let fail = |reason: String| BatchFailure { row, reason };
            let parsed = parsed.map_err(|e| fail(e.to_string()))?;
            let (center, shape) = parsed.to_request().map_err(|e| fail(e.to_string()))?;

            let name = parsed
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("row-{}", row));
            Ok(to_feature(&generate(center, &shape), &name))
        })
        .collect();

    let mut features = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(feature) => features.push(feature),
            Err(failure) => failures.push(failure),
        }
    }

    tracing::info!(total, successful = features.len(), failed = failures.len(), "batch generated");

    Ok(BatchOutcome {
        total,
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        failures,
    })
}
