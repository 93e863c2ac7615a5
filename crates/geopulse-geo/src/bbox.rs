//! Bounding-box derivation around a resolved point.

use crate::types::{BoundingBox, Coordinates};

/// Default expansion in degrees for each direction.
pub const DEFAULT_DELTA: f64 = 0.1;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Expand a point by `delta` degrees in each direction.
///
/// `radius_km` is half the great-circle distance between the box's opposite
/// corners. All outputs are rounded to 2 decimal places.
pub fn bounding_box(center: Coordinates, delta: f64) -> BoundingBox {
    let lat_min = center.latitude - delta;
    let lat_max = center.latitude + delta;
    let lon_min = center.longitude - delta;
    let lon_max = center.longitude + delta;

    let diagonal = haversine_km(lat_min, lon_min, lat_max, lon_max);

    BoundingBox {
        lat_min: round2(lat_min),
        lat_max: round2(lat_max),
        lon_min: round2(lon_min),
        lon_max: round2(lon_max),
        radius_km: round2(diagonal / 2.0),
    }
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
