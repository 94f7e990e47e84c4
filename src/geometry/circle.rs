//! Circular AOI outlines
//!
//! [`geodesic_circle`] is the correct construction: every vertex sits exactly
//! `radius_km` of ground distance from the center. [`degree_buffer_circle`]
//! is a planar buffer in degree space that turns into an ellipse on the
//! ground away from the equator; it is only offered as an explicitly
//! lower-fidelity preview.

use std::f64::consts::PI;

use geo::{coord, Coord, LineString, Polygon};

use super::bbox::Pole;
use super::geodesic::{destination, distance_to_pole_km, unwrap_longitude, wrap180};
use crate::types::CenterPoint;

/// Bearing increment between sampled vertices, in degrees
pub const BEARING_STEP_DEG: f64 = 5.0;

/// Vertices in a default geodesic circle ring, closing vertex included
pub const GEODESIC_VERTEX_COUNT: usize = 73;

/// Kilometers per degree assumed by the degree buffer
pub const KM_PER_DEGREE: f64 = 111.0;

/// Segments in a degree-buffer ring
pub const DEGREE_BUFFER_SEGMENTS: usize = 64;

/// Samples a closed ring of points `radius_km` from `center` every 5°
pub fn geodesic_circle(center: CenterPoint, radius_km: f64) -> Polygon<f64> {
    geodesic_circle_with_step(center, radius_km, BEARING_STEP_DEG)
}

/// Samples a geodesic circle with a custom bearing step
///
/// The step is adjusted so that a whole number of steps (at least three)
/// spans exactly 360°. Vertices run clockwise from due north, longitudes are
/// unwrapped around the center and the last vertex repeats the first.
pub fn geodesic_circle_with_step(center: CenterPoint, radius_km: f64, step_deg: f64) -> Polygon<f64> {
    let steps = (360.0 / step_deg).round().max(3.0) as usize;
    let step = 360.0 / steps as f64;

    let mut ring: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let p = destination(center, i as f64 * step, radius_km);
            coord! { x: unwrap_longitude(p.x(), center.longitude), y: p.y() }
        })
        .collect();
    ring.push(ring[0]);

    Polygon::new(LineString::new(ring), vec![])
}

/// Planar circle of `radius_km / 111` degrees around the center
pub fn degree_buffer_circle(center: CenterPoint, radius_km: f64) -> Polygon<f64> {
    let radius_deg = radius_km / KM_PER_DEGREE;

    let mut ring: Vec<Coord<f64>> = (0..DEGREE_BUFFER_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / DEGREE_BUFFER_SEGMENTS as f64;
            coord! {
                x: center.longitude + radius_deg * angle.cos(),
                y: center.latitude + radius_deg * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);

    Polygon::new(LineString::new(ring), vec![])
}

/// Geodesic circle around a pole it encloses, cut open at the antimeridian
///
/// Rim vertices are wrapped into [-180, 180] and ordered by longitude. The
/// ring leaves the rim at the ±180 meridian, runs to the pole along it,
/// crosses the pole edge through longitude 0 and returns, so in lon/lat space
/// it is a simple counter-clockwise polygon covering the whole cap.
pub fn polar_cap_circle(center: CenterPoint, radius_km: f64, pole: Pole) -> Polygon<f64> {
    let steps = (360.0 / BEARING_STEP_DEG).round() as usize;
    let step = 360.0 / steps as f64;

    let mut rim: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let p = destination(center, i as f64 * step, radius_km);
            coord! { x: wrap180(p.x()), y: p.y() }
        })
        .collect();
    rim.sort_by(|a, b| a.x.total_cmp(&b.x));

    // Rim latitude where it meets the antimeridian, between its two outermost vertices
    let (west, east) = (rim[0], rim[rim.len() - 1]);
    let gap = west.x + 360.0 - east.x;
    let seam_lat = if gap > 0.0 {
        east.y + (180.0 - east.x) / gap * (west.y - east.y)
    } else {
        east.y
    };

    let mut ring = Vec::with_capacity(steps + 6);
    match pole {
        Pole::North => {
            ring.push(coord! { x: -180.0, y: seam_lat });
            ring.extend(rim);
            ring.push(coord! { x: 180.0, y: seam_lat });
            ring.push(coord! { x: 180.0, y: 90.0 });
            ring.push(coord! { x: 0.0, y: 90.0 });
            ring.push(coord! { x: -180.0, y: 90.0 });
        }
        Pole::South => {
            ring.push(coord! { x: 180.0, y: seam_lat });
            ring.extend(rim.into_iter().rev());
            ring.push(coord! { x: -180.0, y: seam_lat });
            ring.push(coord! { x: -180.0, y: -90.0 });
            ring.push(coord! { x: 0.0, y: -90.0 });
            ring.push(coord! { x: 180.0, y: -90.0 });
        }
    }
    ring.push(ring[0]);

    Polygon::new(LineString::new(ring), vec![])
}

/// The pole lying inside a geodesic circle, if any
pub fn enclosed_pole(center: CenterPoint, radius_km: f64) -> Option<Pole> {
    if radius_km >= distance_to_pole_km(center, true) {
        Some(Pole::North)
    } else if radius_km >= distance_to_pole_km(center, false) {
        Some(Pole::South)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geodesic::distance_km;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_count_and_closure() {
        let polygon = geodesic_circle(CenterPoint::new(34.4871, 110.0847), 5.0);
        let ring = &polygon.exterior().0;
        assert_eq!(ring.len(), GEODESIC_VERTEX_COUNT);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_vertices_equidistant() {
        let center = CenterPoint::new(62.0, -150.0);
        let polygon = geodesic_circle(center, 40.0);
        for c in polygon.exterior().coords() {
            let d = distance_km(center.to_point(), geo::Point::from(*c));
            assert_relative_eq!(d, 40.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_first_vertex_due_north() {
        let center = CenterPoint::new(10.0, 20.0);
        let polygon = geodesic_circle(center, 10.0);
        let first = polygon.exterior().0[0];
        assert_relative_eq!(first.x, 20.0, epsilon = 1e-9);
        assert!(first.y > 10.0);
    }

    #[test]
    fn test_custom_step() {
        let polygon = geodesic_circle_with_step(CenterPoint::new(0.0, 0.0), 1.0, 90.0);
        assert_eq!(polygon.exterior().0.len(), 5);

        let polygon = geodesic_circle_with_step(CenterPoint::new(0.0, 0.0), 1.0, 500.0);
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_antimeridian_ring_is_contiguous() {
        let center = CenterPoint::new(0.0, 179.95);
        let polygon = geodesic_circle(center, 20.0);
        for c in polygon.exterior().coords() {
            assert!((c.x - center.longitude).abs() < 1.0, "x = {}", c.x);
        }
    }

    #[test]
    fn test_degree_buffer_is_round_in_degrees() {
        let center = CenterPoint::new(60.0, 10.0);
        let polygon = degree_buffer_circle(center, 111.0);
        assert_eq!(polygon.exterior().0.len(), DEGREE_BUFFER_SEGMENTS + 1);
        for c in polygon.exterior().coords() {
            let r = ((c.x - 10.0).powi(2) + (c.y - 60.0).powi(2)).sqrt();
            assert_relative_eq!(r, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polar_cap_ring() {
        for (lat, pole) in [(89.8, Pole::North), (-89.5, Pole::South), (90.0, Pole::North)] {
            let center = CenterPoint::new(lat, 30.0);
            let polygon = polar_cap_circle(center, 50.0, pole);
            let ring = &polygon.exterior().0;

            assert_eq!(ring.first(), ring.last());
            for pair in ring.windows(2) {
                assert!((pair[1].x - pair[0].x).abs() <= 180.0, "jump {:?}", pair);
            }
            for c in ring {
                assert!((-180.0..=180.0).contains(&c.x));
                assert!((-90.0..=90.0).contains(&c.y));
            }

            // Rim vertices keep their ground distance
            let rim = ring.iter().filter(|c| c.x.abs() < 180.0 && c.y.abs() < 90.0);
            for c in rim {
                let d = distance_km(center.to_point(), geo::Point::from(*c));
                assert_relative_eq!(d, 50.0, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_polar_cap_ring_is_counter_clockwise() {
        use geo::Winding;

        let north = polar_cap_circle(CenterPoint::new(89.8, 30.0), 50.0, Pole::North);
        assert!(north.exterior().is_ccw());
        let south = polar_cap_circle(CenterPoint::new(-89.8, 30.0), 50.0, Pole::South);
        assert!(south.exterior().is_ccw());
    }

    #[test]
    fn test_enclosed_pole() {
        assert_eq!(enclosed_pole(CenterPoint::new(89.5, 0.0), 100.0), Some(Pole::North));
        assert_eq!(enclosed_pole(CenterPoint::new(-89.5, 0.0), 100.0), Some(Pole::South));
        assert_eq!(enclosed_pole(CenterPoint::new(45.0, 0.0), 100.0), None);
    }
}
