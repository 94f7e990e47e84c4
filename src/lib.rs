//! geo-data-master - Area-of-interest generation for elevation downloads
//!
//! geo-data-master turns a center point and a size in kilometers into a
//! WGS84 polygon and bounding box, exports it as GeoJSON and downloads the
//! matching digital elevation model from OpenTopography.
//!
//! # Examples
//!
//! ## Rectangle around a summit
//!
//! ```
//! use geo_data_master::{generate, CenterPoint, ShapeRequest};
//!
//! let everest = CenterPoint::validated(27.9881, 86.9250)?;
//! let aoi = generate(everest, &ShapeRequest::rectangle(10.0, 10.0));
//!
//! assert_eq!(aoi.label.as_str(), "10x10km");
//! assert!(aoi.bbox.min_lon < aoi.bbox.max_lon);
//! println!("{}", aoi.raster_bbox());
//! # Ok::<(), geo_data_master::Error>(())
//! ```
//!
//! ## Circle exported as GeoJSON
//!
//! ```
//! use geo_data_master::{export, generate, CenterPoint, ShapeRequest};
//!
//! let hua_shan = CenterPoint::validated(34.4871, 110.0847)?;
//! let aoi = generate(hua_shan, &ShapeRequest::circle(5.0));
//!
//! assert_eq!(aoi.vertex_count(), 73);
//! let geojson = export::to_geojson_string(&aoi, "Hua Shan")?;
//! assert!(geojson.contains("R5km"));
//! # Ok::<(), geo_data_master::Error>(())
//! ```
//!
//! ## Downloading a DEM
//!
//! ```no_run
//! use geo_data_master::{generate, CenterPoint, Config, Dataset, DemClient, ShapeRequest};
//!
//! # async fn run() -> geo_data_master::Result<()> {
//! let config = Config::from_env()?;
//! let client = DemClient::new(&config)?;
//!
//! let aoi = generate(CenterPoint::new(46.5, 7.9), &ShapeRequest::rectangle(20.0, 20.0));
//! let raster = client.fetch(&aoi.bbox, Dataset::Cop30).await?;
//! std::fs::write("dem.tif", &raster.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod batch;
pub mod cache;
pub mod config;
pub mod dem;
pub mod error;
pub mod export;
pub mod geocode;
pub mod geometry;
pub mod types;

pub use config::Config;
pub use dem::{Dataset, DemClient, Raster};
pub use error::{Error, Result};
pub use geocode::{Geocoder, Place};
pub use geometry::{generate, generate_with, Aoi, BoundingBox, CircleFidelity};
pub use types::{CenterPoint, ShapeKind, ShapeRequest, SizeLabel};
