//! Error types for geo-data-master

use std::io;
use thiserror::Error;

/// Result type for geo-data-master operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building, exporting or fetching an AOI
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caller supplied an out-of-range or malformed value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service did not answer in time
    #[error("Request timed out after {0} s")]
    Timeout(u64),

    /// Geocoding service returned something unusable
    #[error("Geocoding failed: {0}")]
    Geocode(String),

    /// No OpenTopography API key configured
    #[error("An OpenTopography API key is required")]
    MissingApiKey,

    /// Provider refused the API key
    #[error("Provider rejected the API key (HTTP {0})")]
    Unauthorized(u16),

    /// Dataset has no data for the requested area
    #[error("Dataset {dataset} has no coverage for the requested area")]
    NoCoverage { dataset: String },

    /// Requested area exceeds what the provider serves for this dataset
    #[error("Requested area of {area_km2:.0} km² exceeds the {limit_km2:.0} km² limit of {dataset}")]
    AreaTooLarge {
        dataset: String,
        area_km2: f64,
        limit_km2: f64,
    },

    /// Bounding box straddles the 180° meridian
    #[error("Bounding box crosses the antimeridian ({min_lon:.5} to {max_lon:.5})")]
    CrossesAntimeridian { min_lon: f64, max_lon: f64 },

    /// Provider rejected the request parameters (HTTP 400)
    #[error("Request rejected by provider: {0}")]
    Rejected(String),

    /// Provider answered 200 with an error page instead of a raster
    #[error("Provider error: {0}")]
    Provider(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Suggested next step for the end user, when one exists
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            Error::MissingApiKey | Error::Unauthorized(_) => Some(
                "Supply a valid OpenTopography API key (free at https://portal.opentopography.org)",
            ),
            Error::AreaTooLarge { .. } => {
                Some("Reduce the area or choose a coarser dataset such as COP90 or SRTMGL3")
            }
            Error::NoCoverage { .. } | Error::Provider(_) => {
                Some("Retry with a different dataset, e.g. SRTMGL1 or NASADEM")
            }
            Error::Rejected(_) => Some("Reduce the area or choose a different dataset"),
            Error::CrossesAntimeridian { .. } => {
                Some("Move the center away from the 180° meridian or request each side separately")
            }
            Error::Timeout(_) | Error::Http(_) | Error::HttpStatus { .. } => {
                Some("Retry later or download manually from https://portal.opentopography.org/datasets")
            }
            Error::Geocode(_) => Some("Try a more specific place name or enter coordinates directly"),
            _ => None,
        }
    }

    /// Whether another dataset might succeed where this one failed
    pub fn is_dataset_specific(&self) -> bool {
        matches!(
            self,
            Error::NoCoverage { .. }
                | Error::AreaTooLarge { .. }
                | Error::Rejected(_)
                | Error::Provider(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("latitude 91 out of range".to_string());
        assert_eq!(err.to_string(), "Invalid input: latitude 91 out of range");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_area_too_large_message() {
        let err = Error::AreaTooLarge {
            dataset: "USGS1m".to_string(),
            area_km2: 1234.4,
            limit_km2: 250.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("1234"));
        assert!(msg.contains("250"));
        assert!(msg.contains("USGS1m"));
    }

    #[test]
    fn test_remedies() {
        assert!(Error::MissingApiKey.remedy().unwrap().contains("API key"));
        assert!(Error::Timeout(60).remedy().is_some());
        assert!(Error::InvalidInput("x".into()).remedy().is_none());
    }

    #[test]
    fn test_dataset_specific() {
        assert!(Error::NoCoverage { dataset: "COP30".into() }.is_dataset_specific());
        assert!(Error::Provider("html".into()).is_dataset_specific());
        assert!(!Error::Unauthorized(401).is_dataset_specific());
        assert!(!Error::MissingApiKey.is_dataset_specific());
        assert!(!Error::Timeout(5).is_dataset_specific());
    }
}
