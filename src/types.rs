//! Core data types for geo-data-master

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest rectangle side accepted from callers, in kilometers
pub const MAX_SIDE_KM: f64 = 500.0;

/// Largest circle radius accepted from callers, in kilometers
pub const MAX_RADIUS_KM: f64 = 250.0;

/// Smallest linear dimension the generator will project, in kilometers
pub const MIN_DIMENSION_KM: f64 = 0.02;

/// A WGS84 geodetic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterPoint {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

impl CenterPoint {
    /// Creates a center point without range checks
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a center point, rejecting coordinates outside the geodetic range
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Returns the point in longitude-first order
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// The two supported AOI outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
}

impl ShapeKind {
    /// Returns the name of this shape
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" | "box" => Ok(ShapeKind::Rectangle),
            "circle" | "circ" => Ok(ShapeKind::Circle),
            other => Err(Error::InvalidInput(format!("unknown shape '{}'", other))),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape and ground dimensions of an AOI, in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeRequest {
    Rectangle { width_km: f64, height_km: f64 },
    Circle { radius_km: f64 },
}

impl ShapeRequest {
    pub fn rectangle(width_km: f64, height_km: f64) -> Self {
        ShapeRequest::Rectangle { width_km, height_km }
    }

    pub fn circle(radius_km: f64) -> Self {
        ShapeRequest::Circle { radius_km }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRequest::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeRequest::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Checks that every dimension is positive, finite and within the input limits
    pub fn validate(&self) -> Result<()> {
        match *self {
            ShapeRequest::Rectangle { width_km, height_km } => {
                check_dimension("width_km", width_km, MAX_SIDE_KM)?;
                check_dimension("height_km", height_km, MAX_SIDE_KM)
            }
            ShapeRequest::Circle { radius_km } => {
                check_dimension("radius_km", radius_km, MAX_RADIUS_KM)
            }
        }
    }

    /// Returns a copy with every dimension raised to at least [`MIN_DIMENSION_KM`]
    pub fn floored(&self) -> Self {
        match *self {
            ShapeRequest::Rectangle { width_km, height_km } => ShapeRequest::Rectangle {
                width_km: floor_dimension(width_km),
                height_km: floor_dimension(height_km),
            },
            ShapeRequest::Circle { radius_km } => ShapeRequest::Circle {
                radius_km: floor_dimension(radius_km),
            },
        }
    }

    /// Derives the display label, e.g. `10x10km` or `R5km`
    ///
    /// Sizes use the shortest decimal form, so `10.0` renders as `10`.
    pub fn label(&self) -> SizeLabel {
        match *self {
            ShapeRequest::Rectangle { width_km, height_km } => {
                SizeLabel(format!("{}x{}km", width_km, height_km))
            }
            ShapeRequest::Circle { radius_km } => SizeLabel(format!("R{}km", radius_km)),
        }
    }
}

fn check_dimension(name: &str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    if value > max {
        return Err(Error::InvalidInput(format!(
            "{} must not exceed {} km, got {}",
            name, max, value
        )));
    }
    Ok(())
}

fn floor_dimension(km: f64) -> f64 {
    if km.is_finite() && km > MIN_DIMENSION_KM {
        km
    } else {
        MIN_DIMENSION_KM
    }
}

/// Short human-readable size descriptor used on screen and in file names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeLabel(String);

impl SizeLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
