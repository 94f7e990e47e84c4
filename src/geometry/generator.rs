use geo::Polygon;
use serde::{Deserialize, Serialize};

use super::bbox::{BoundingBox, MIN_EXTENT_DEG};
use super::circle::{degree_buffer_circle, enclosed_pole, geodesic_circle, polar_cap_circle};
use super::rectangle::project_rectangle;
use crate::types::{CenterPoint, ShapeRequest, SizeLabel};

/// How a circular AOI is outlined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleFidelity {
    /// Vertices at exact ground distance from the center
    #[default]
    Geodesic,
    /// `radius_km / 111` degree planar buffer, preview only
    DegreeBuffer,
}

/// A generated area of interest
#[derive(Debug, Clone, PartialEq)]
pub struct Aoi {
    pub center: CenterPoint,
    /// The shape as requested, before any dimension floor
    pub shape: ShapeRequest,
    /// Closed lon/lat ring
    pub polygon: Polygon<f64>,
    pub bbox: BoundingBox,
    pub label: SizeLabel,
}

impl Aoi {
    /// Bounding box rounded outward to 5 decimals for the raster provider
    pub fn raster_bbox(&self) -> BoundingBox {
        self.bbox.for_raster()
    }

    /// Exterior ring as `(lon, lat)` pairs
    pub fn ring(&self) -> Vec<(f64, f64)> {
        self.polygon.exterior().coords().map(|c| (c.x, c.y)).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygon.exterior().0.len()
    }
}

/// Builds the AOI polygon, bounding box and size label for `shape` around `center`
///
/// Circles use the geodesic construction. The function is total over valid
/// centers: near-zero dimensions are floored before projection and the box is
/// widened to a minimum extent, so the result always has positive area.
pub fn generate(center: CenterPoint, shape: &ShapeRequest) -> Aoi {
    generate_with(center, shape, CircleFidelity::Geodesic)
}

/// Like [`generate`], with an explicit circle fidelity
pub fn generate_with(center: CenterPoint, shape: &ShapeRequest, fidelity: CircleFidelity) -> Aoi {
    let polygon = match shape.floored() {
        ShapeRequest::Rectangle { width_km, height_km } => {
            project_rectangle(center, width_km, height_km).to_polygon()
        }
        ShapeRequest::Circle { radius_km } => match fidelity {
            CircleFidelity::Geodesic => match enclosed_pole(center, radius_km) {
                Some(pole) => polar_cap_circle(center, radius_km, pole),
                None => geodesic_circle(center, radius_km),
            },
            CircleFidelity::DegreeBuffer => degree_buffer_circle(center, radius_km),
        },
    };

    let bbox = BoundingBox::from_polygon(&polygon)
        .unwrap_or_else(|| BoundingBox::point(center.longitude, center.latitude))
        .ensure_min_extent(MIN_EXTENT_DEG);

    tracing::trace!(
        shape = shape.kind().name(),
        vertices = polygon.exterior().0.len(),
        %bbox,
        "generated AOI"
    );

    Aoi {
        center,
        shape: *shape,
        polygon,
        bbox,
        label: shape.label(),
    }
}
