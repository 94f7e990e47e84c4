use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::error::Result;
use crate::geometry::Aoi;

/// Wraps an AOI in a Polygon feature with `name`, `desc`, `shape` and `center` properties
pub fn to_feature(aoi: &Aoi, name: &str) -> Feature {
    let ring: Vec<Vec<f64>> = aoi
        .polygon
        .exterior()
        .coords()
        .map(|c| vec![c.x, c.y])
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), JsonValue::from(name));
    properties.insert("desc".to_string(), JsonValue::from(aoi.label.as_str()));
    properties.insert("shape".to_string(), JsonValue::from(aoi.shape.kind().name()));
    properties.insert(
        "center".to_string(),
        JsonValue::from(vec![aoi.center.longitude, aoi.center.latitude]),
    );

    Feature {
        bbox: Some(aoi.bbox.to_array().to_vec()),
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Single-feature collection, the layout written to `.geojson` files
pub fn to_feature_collection(aoi: &Aoi, name: &str) -> FeatureCollection {
    FeatureCollection {
        bbox: Some(aoi.bbox.to_array().to_vec()),
        features: vec![to_feature(aoi, name)],
        foreign_members: None,
    }
}

pub fn to_geojson_string(aoi: &Aoi, name: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_feature_collection(aoi, name))?)
}
