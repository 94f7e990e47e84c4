//! Axis-aligned lon/lat bounding boxes

use std::fmt;

use geo::{coord, BoundingRect, GeodesicArea, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Narrowest extent a bounding box may have on either axis, in degrees (~11 m)
pub const MIN_EXTENT_DEG: f64 = 1e-4;

/// Decimal places kept when handing a box to the raster provider
pub const RASTER_DECIMALS: u32 = 5;

// Scaled values this close to a grid step are treated as on it
const ROUNDING_SLACK: f64 = 1e-6;

/// Which pole an AOI reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

/// `(min_lon, min_lat, max_lon, max_lat)` with `min <= max` on both axes
///
/// Longitudes may leave [-180, 180] when the box is unwrapped across the
/// antimeridian; [`BoundingBox::crosses_antimeridian`] reports that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Creates a box from two opposite corners in any order
    pub fn new(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> Self {
        Self {
            min_lon: lon_a.min(lon_b),
            min_lat: lat_a.min(lat_b),
            max_lon: lon_a.max(lon_b),
            max_lat: lat_a.max(lat_b),
        }
    }

    /// Zero-area box at a single point
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    /// Vertex extrema of a polygon's exterior ring
    pub fn from_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        polygon
            .bounding_rect()
            .map(|rect| Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    pub fn width_deg(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height_deg(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Midpoint of the diagonal as `(lon, lat)`
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon < -180.0 || self.max_lon > 180.0
    }

    /// Widens any axis narrower than `min_deg` symmetrically about its midpoint
    ///
    /// Latitudes stay inside [-90, 90]; a box pressed against a pole is
    /// widened away from it instead.
    pub fn ensure_min_extent(self, min_deg: f64) -> Self {
        let mut bbox = self;

        if bbox.width_deg() < min_deg {
            let mid = (bbox.min_lon + bbox.max_lon) / 2.0;
            bbox.min_lon = mid - min_deg / 2.0;
            bbox.max_lon = mid + min_deg / 2.0;
        }

        if bbox.height_deg() < min_deg {
            let mid = (bbox.min_lat + bbox.max_lat) / 2.0;
            bbox.min_lat = mid - min_deg / 2.0;
            bbox.max_lat = mid + min_deg / 2.0;
            if bbox.max_lat > 90.0 {
                bbox.max_lat = 90.0;
                bbox.min_lat = 90.0 - min_deg;
            } else if bbox.min_lat < -90.0 {
                bbox.min_lat = -90.0;
                bbox.max_lat = -90.0 + min_deg;
            }
        }

        bbox
    }

    /// Stretches the box to touch a pole and span every longitude
    pub fn extend_to_pole(self, pole: Pole) -> Self {
        let (min_lat, max_lat) = match pole {
            Pole::North => (self.min_lat, 90.0),
            Pole::South => (-90.0, self.max_lat),
        };
        Self {
            min_lon: -180.0,
            min_lat,
            max_lon: 180.0,
            max_lat,
        }
    }

    /// Rounds outward to `decimals` places so the result still contains `self`
    pub fn rounded(&self, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        Self {
            min_lon: (self.min_lon * scale + ROUNDING_SLACK).floor() / scale,
            min_lat: (self.min_lat * scale + ROUNDING_SLACK).floor() / scale,
            max_lon: (self.max_lon * scale - ROUNDING_SLACK).ceil() / scale,
            max_lat: (self.max_lat * scale - ROUNDING_SLACK).ceil() / scale,
        }
    }

    /// Box as sent to the raster provider: widened first, then rounded
    pub fn for_raster(&self) -> Self {
        self.ensure_min_extent(MIN_EXTENT_DEG).rounded(RASTER_DECIMALS)
    }

    /// Closed counter-clockwise ring, starting at the south-west corner
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::new(vec![
                coord! { x: self.min_lon, y: self.min_lat },
                coord! { x: self.max_lon, y: self.min_lat },
                coord! { x: self.max_lon, y: self.max_lat },
                coord! { x: self.min_lon, y: self.max_lat },
                coord! { x: self.min_lon, y: self.min_lat },
            ]),
            vec![],
        )
    }

    /// Ellipsoidal surface area in square kilometers
    pub fn area_km2(&self) -> f64 {
        self.to_polygon().geodesic_area_unsigned() / 1.0e6
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "W {:.5} S {:.5} E {:.5} N {:.5}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_sorts_corners() {
        let bbox = BoundingBox::new(10.0, 5.0, -3.0, -7.0);
        assert_eq!(bbox.to_array(), [-3.0, -7.0, 10.0, 5.0]);
    }

    #[test]
    fn test_from_polygon() {
        let polygon = BoundingBox::new(1.0, 2.0, 3.0, 4.0).to_polygon();
        assert_eq!(polygon.exterior().0.len(), 5);
        let bbox = BoundingBox::from_polygon(&polygon).unwrap();
        assert_eq!(bbox.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ensure_min_extent_widens_degenerate_box() {
        let bbox = BoundingBox::point(86.925, 27.9881).ensure_min_extent(MIN_EXTENT_DEG);
        assert!(bbox.min_lon < bbox.max_lon);
        assert!(bbox.min_lat < bbox.max_lat);
        assert_relative_eq!(bbox.width_deg(), MIN_EXTENT_DEG, epsilon = 1e-12);
        let (lon, lat) = bbox.center();
        assert_relative_eq!(lon, 86.925, epsilon = 1e-12);
        assert_relative_eq!(lat, 27.9881, epsilon = 1e-12);
    }

    #[test]
    fn test_ensure_min_extent_keeps_wide_box() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(bbox.ensure_min_extent(MIN_EXTENT_DEG), bbox);
    }

    #[test]
    fn test_ensure_min_extent_at_pole() {
        let bbox = BoundingBox::point(0.0, 90.0).ensure_min_extent(MIN_EXTENT_DEG);
        assert_eq!(bbox.max_lat, 90.0);
        assert!(bbox.min_lat < 90.0);

        let bbox = BoundingBox::point(0.0, -90.0).ensure_min_extent(MIN_EXTENT_DEG);
        assert_eq!(bbox.min_lat, -90.0);
        assert!(bbox.max_lat > -90.0);
    }

    #[test]
    fn test_rounded_is_outward() {
        let bbox = BoundingBox::new(86.8741234, 27.9431234, 86.9758766, 28.0330766);
        let r = bbox.rounded(5);
        assert_relative_eq!(r.min_lon, 86.87412, epsilon = 1e-9);
        assert_relative_eq!(r.min_lat, 27.94312, epsilon = 1e-9);
        assert_relative_eq!(r.max_lon, 86.97588, epsilon = 1e-9);
        assert_relative_eq!(r.max_lat, 28.03308, epsilon = 1e-9);
        assert!(r.min_lon <= bbox.min_lon && r.max_lon >= bbox.max_lon);
    }

    #[test]
    fn test_rounded_keeps_values_on_grid() {
        let bbox = BoundingBox::new(86.87412, 27.94312, 86.97588, 28.03308);
        assert_eq!(format!("{:.5}", bbox.rounded(5).min_lon), "86.87412");
        assert_eq!(format!("{:.5}", bbox.rounded(5).max_lat), "28.03308");
    }

    #[test]
    fn test_for_raster_never_collapses() {
        let bbox = BoundingBox::point(12.345678, 45.678901).for_raster();
        assert!(bbox.min_lon < bbox.max_lon);
        assert!(bbox.min_lat < bbox.max_lat);
    }

    #[test]
    fn test_crosses_antimeridian() {
        assert!(BoundingBox::new(179.9, 0.0, 180.1, 1.0).crosses_antimeridian());
        assert!(!BoundingBox::new(-180.0, 0.0, 180.0, 1.0).crosses_antimeridian());
    }

    #[test]
    fn test_extend_to_pole() {
        let bbox = BoundingBox::new(10.0, 85.0, 20.0, 88.0).extend_to_pole(Pole::North);
        assert_eq!(bbox.to_array(), [-180.0, 85.0, 180.0, 90.0]);
    }

    #[test]
    fn test_area_one_degree_at_equator() {
        // ~111.32 km x ~110.57 km
        let area = BoundingBox::new(0.0, 0.0, 1.0, 1.0).area_km2();
        assert!((area - 12_308.0).abs() < 50.0, "got {}", area);
    }
}
