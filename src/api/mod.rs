//! HTTP surface: AOI preview and export, geocoding, DEM download, CSV batches

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::create_router;

use crate::config::Config;
use crate::dem::DemClient;
use crate::error::Result;
use crate::geocode::Geocoder;

/// Clients shared by every request
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Geocoder,
    pub dem: DemClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            geocoder: Geocoder::new(config)?,
            dem: DemClient::new(config)?,
        })
    }
}
