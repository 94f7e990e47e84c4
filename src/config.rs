//! Runtime configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Every field has a default except the
//! OpenTopography API key.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_OPENTOPOGRAPHY_URL: &str = "https://portal.opentopography.org/API";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "geo_data_master";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CACHE_CAPACITY: usize = 32;
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub opentopography_api_key: Option<String>,
    pub opentopography_url: String,
    pub nominatim_url: String,
    /// Nominatim rejects requests without an identifying User-Agent
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Rasters kept in memory by the DEM client
    pub dem_cache_capacity: usize,
    pub listen_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opentopography_api_key: None,
            opentopography_url: DEFAULT_OPENTOPOGRAPHY_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            dem_cache_capacity: DEFAULT_CACHE_CAPACITY,
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.opentopography_api_key = get("OPENTOPOGRAPHY_API_KEY");
        if let Some(url) = get("OPENTOPOGRAPHY_URL") {
            config.opentopography_url = url;
        }
        if let Some(url) = get("NOMINATIM_URL") {
            config.nominatim_url = url;
        }
        if let Some(agent) = get("GEOCODER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(capacity) = get("DEM_CACHE_CAPACITY") {
            config.dem_cache_capacity = parse_var("DEM_CACHE_CAPACITY", &capacity)?;
        }
        if let Some(address) = get("LISTEN_ADDRESS") {
            config.listen_address = address;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.opentopography_api_key = Some(key);
        }
        self
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, value)))
}
