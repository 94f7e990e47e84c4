use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// OpenTopography API family a dataset is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/globaldem`, datasets selected with `demtype`
    Global,
    /// `/usgsdem`, datasets selected with `datasetName`
    Usgs,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Global => "globaldem",
            Endpoint::Usgs => "usgsdem",
        }
    }

    pub fn dataset_param(&self) -> &'static str {
        match self {
            Endpoint::Global => "demtype",
            Endpoint::Usgs => "datasetName",
        }
    }
}

/// Elevation datasets available through OpenTopography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dataset {
    /// Copernicus GLO-30
    #[default]
    Cop30,
    /// Copernicus GLO-90
    Cop90,
    /// SRTM GL1, 30 m
    SrtmGl1,
    /// SRTM GL3, 90 m
    SrtmGl3,
    NasaDem,
    /// ALOS World 3D, 30 m
    Aw3d30,
    /// USGS 1 arc-second, continental US
    Usgs30m,
    /// USGS 1/3 arc-second, continental US
    Usgs10m,
    /// USGS 1 m lidar-derived, partial US coverage
    Usgs1m,
}

/// Datasets tried in order when a request asks for fallback
pub const DEFAULT_FALLBACK: [Dataset; 3] = [Dataset::Cop30, Dataset::SrtmGl1, Dataset::NasaDem];

impl Dataset {
    pub const ALL: [Dataset; 9] = [
        Dataset::Cop30,
        Dataset::Cop90,
        Dataset::SrtmGl1,
        Dataset::SrtmGl3,
        Dataset::NasaDem,
        Dataset::Aw3d30,
        Dataset::Usgs30m,
        Dataset::Usgs10m,
        Dataset::Usgs1m,
    ];

    /// Identifier expected by the provider
    pub fn code(&self) -> &'static str {
        match self {
            Dataset::Cop30 => "COP30",
            Dataset::Cop90 => "COP90",
            Dataset::SrtmGl1 => "SRTMGL1",
            Dataset::SrtmGl3 => "SRTMGL3",
            Dataset::NasaDem => "NASADEM",
            Dataset::Aw3d30 => "AW3D30",
            Dataset::Usgs30m => "USGS30m",
            Dataset::Usgs10m => "USGS10m",
            Dataset::Usgs1m => "USGS1m",
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Dataset::Usgs30m | Dataset::Usgs10m | Dataset::Usgs1m => Endpoint::Usgs,
            _ => Endpoint::Global,
        }
    }

    /// Nominal ground resolution in meters
    pub fn resolution_m(&self) -> u32 {
        match self {
            Dataset::Cop90 | Dataset::SrtmGl3 => 90,
            Dataset::Usgs10m => 10,
            Dataset::Usgs1m => 1,
            _ => 30,
        }
    }

    /// Largest request area the provider accepts, in km²
    pub fn max_area_km2(&self) -> f64 {
        match self {
            Dataset::Cop90 | Dataset::SrtmGl3 => 4_050_000.0,
            Dataset::Usgs30m => 225_000.0,
            Dataset::Usgs10m => 25_000.0,
            Dataset::Usgs1m => 250.0,
            _ => 450_000.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dataset::Cop30 => "Copernicus GLO-30 (30m)",
            Dataset::Cop90 => "Copernicus GLO-90 (90m)",
            Dataset::SrtmGl1 => "SRTM GL1 (30m)",
            Dataset::SrtmGl3 => "SRTM GL3 (90m)",
            Dataset::NasaDem => "NASADEM (30m)",
            Dataset::Aw3d30 => "ALOS World 3D (30m)",
            Dataset::Usgs30m => "USGS 1 arc-second (30m, US only)",
            Dataset::Usgs10m => "USGS 1/3 arc-second (10m, US only)",
            Dataset::Usgs1m => "USGS 1m (US only)",
        }
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Dataset::ALL
            .iter()
            .copied()
            .find(|d| d.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("unknown dataset '{}'", wanted)))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("cop30".parse::<Dataset>().unwrap(), Dataset::Cop30);
        assert_eq!("USGS10M".parse::<Dataset>().unwrap(), Dataset::Usgs10m);
        assert!("GTOPO".parse::<Dataset>().is_err());
    }

    #[test]
    fn test_codes_roundtrip() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.code().parse::<Dataset>().unwrap(), dataset);
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Dataset::Cop30.endpoint(), Endpoint::Global);
        assert_eq!(Dataset::Cop30.endpoint().dataset_param(), "demtype");
        assert_eq!(Dataset::Usgs1m.endpoint().path(), "usgsdem");
        assert_eq!(Dataset::Usgs1m.endpoint().dataset_param(), "datasetName");
    }

    #[test]
    fn test_limits() {
        assert!(Dataset::Cop90.max_area_km2() > Dataset::Cop30.max_area_km2());
        assert_eq!(Dataset::Usgs1m.resolution_m(), 1);
        assert_eq!(Dataset::default(), Dataset::Cop30);
    }
}
