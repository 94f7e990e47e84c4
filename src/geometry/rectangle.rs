use super::bbox::{BoundingBox, Pole, MIN_EXTENT_DEG};
use super::geodesic::{destination, wrap180};
use crate::types::CenterPoint;

/// Projects a `width_km` x `height_km` box around `center` along true bearings
///
/// The north and south edges come from geodesic destinations at bearings 0°
/// and 180° (`height_km / 2` away), the east and west edges from bearings
/// 90° and 270° (`width_km / 2` away). East and west are kept on either side
/// of the center longitude, so a box straddling the antimeridian extends past
/// ±180 instead of wrapping around the globe. A meridian projection that runs
/// over a pole stops at that pole, and a box reaching a pole spans every
/// longitude since the whole cap around it is inside.
pub fn project_rectangle(center: CenterPoint, width_km: f64, height_km: f64) -> BoundingBox {
    let half_width = width_km / 2.0;
    let half_height = height_km / 2.0;

    let north = destination(center, 0.0, half_height);
    let south = destination(center, 180.0, half_height);
    let east = destination(center, 90.0, half_width);
    let west = destination(center, 270.0, half_width);

    // At a pole every bearing leads away from it
    let reaches_north = center.latitude >= 90.0 || north.y() < center.latitude;
    let reaches_south = center.latitude <= -90.0 || south.y() > center.latitude;

    let north_lat = if reaches_north { 90.0 } else { north.y() };
    let south_lat = if reaches_south { -90.0 } else { south.y() };

    let east_lon = center.longitude + eastward_offset(east.x() - center.longitude);
    let west_lon = center.longitude - eastward_offset(center.longitude - west.x());

    let mut bbox = BoundingBox::new(west_lon, south_lat, east_lon, north_lat);
    if reaches_north {
        bbox = bbox.extend_to_pole(Pole::North);
    }
    if reaches_south {
        bbox = bbox.extend_to_pole(Pole::South);
    }

    bbox.ensure_min_extent(MIN_EXTENT_DEG)
}

// Longitude travelled in the expected direction; a wrapped or vanished offset
// means the geodesic swung around a pole, so take half the globe.
fn eastward_offset(raw_deg: f64) -> f64 {
    let offset = wrap180(raw_deg);
    if offset > 0.0 {
        offset
    } else {
        180.0
    }
}
