//! Free-text place lookup against a Nominatim service

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::CenterPoint;

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl Place {
    pub fn center(&self) -> CenterPoint {
        CenterPoint::new(self.latitude, self.longitude)
    }
}

// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl Geocoder {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Resolves `query` to its best match, or `None` when nothing matches
    pub async fn lookup(&self, query: &str) -> Result<Option<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("place name must not be empty".to_string()));
        }

        let url = format!("{}/search", self.base_url);
        tracing::debug!(%url, query, "geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        let place = parse_search_response(&body)?;

        match &place {
            Some(p) => tracing::info!(query, lat = p.latitude, lon = p.longitude, "place resolved"),
            None => tracing::info!(query, "place not found"),
        }

        Ok(place)
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Http(err)
        }
    }
}

/// Picks the first hit of a Nominatim `/search` JSON array
pub fn parse_search_response(body: &str) -> Result<Option<Place>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)?;

    let hit = match hits.into_iter().next() {
        Some(hit) => hit,
        None => return Ok(None),
    };

    let latitude: f64 = hit
        .lat
        .parse()
        .map_err(|_| Error::Geocode(format!("unparseable latitude '{}'", hit.lat)))?;
    let longitude: f64 = hit
        .lon
        .parse()
        .map_err(|_| Error::Geocode(format!("unparseable longitude '{}'", hit.lon)))?;

    Ok(Some(Place {
        latitude,
        longitude,
        address: hit.display_name,
    }))
}
