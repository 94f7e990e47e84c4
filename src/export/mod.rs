//! GeoJSON serialization and output file naming

pub mod geojson;
pub mod naming;

pub use self::geojson::{to_feature, to_feature_collection, to_geojson_string};
pub use naming::{
    content_disposition, dem_file_name, geojson_file_name, sanitize_name, GEOJSON_MEDIA_TYPE,
    TIFF_MEDIA_TYPE,
};
