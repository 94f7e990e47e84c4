use geo::{Destination, Distance, Geodesic, Point};

use crate::types::CenterPoint;

/// Projects `distance_km` of ground distance from `center` along `bearing_deg`
///
/// Bearings are clockwise from true north. The returned longitude is in
/// [-180, 180]; use [`unwrap_longitude`] to keep it next to the center.
pub fn destination(center: CenterPoint, bearing_deg: f64, distance_km: f64) -> Point<f64> {
    Geodesic::destination(center.to_point(), bearing_deg, distance_km * 1000.0)
}

/// Ellipsoidal ground distance between two lon/lat points, in kilometers
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Geodesic::distance(a, b) / 1000.0
}

/// Ground distance from `center` to the north (or south) pole, in kilometers
pub fn distance_to_pole_km(center: CenterPoint, north: bool) -> f64 {
    let pole_lat = if north { 90.0 } else { -90.0 };
    distance_km(center.to_point(), Point::new(center.longitude, pole_lat))
}

/// Wraps an angle in degrees into (-180, 180]
pub fn wrap180(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Shifts `lon` by a multiple of 360° so it lies within 180° of `reference`
pub fn unwrap_longitude(lon: f64, reference: f64) -> f64 {
    reference + wrap180(lon - reference)
}
