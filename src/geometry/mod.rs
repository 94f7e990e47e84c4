//! Geodesic area-of-interest construction on the WGS84 ellipsoid

pub mod bbox;
pub mod circle;
pub mod generator;
pub mod geodesic;
pub mod rectangle;

pub use bbox::{BoundingBox, Pole, MIN_EXTENT_DEG, RASTER_DECIMALS};
pub use circle::{
    degree_buffer_circle, geodesic_circle, polar_cap_circle, BEARING_STEP_DEG, GEODESIC_VERTEX_COUNT,
};
pub use generator::{generate, generate_with, Aoi, CircleFidelity};
pub use rectangle::project_rectangle;
