use crate::models::BoundingBox;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack added to bounding boxes so that points sitting exactly on the
/// radius are never lost to floating point error in the pre-filter.
const BBOX_EPSILON_DEG: f64 = 1e-9;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers on a spherical Earth
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate a bounding box that contains every point within `radius_km`
/// of the center.
///
/// The longitude extent uses the exact great-circle bound
/// `asin(sin(r/R) / cos(lat))`, so the box is a safe pre-filter for
/// [`haversine_distance`]. Returns `None` when the box would reach a pole
/// or wrap across the antimeridian; callers then skip pre-filtering.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> Option<BoundingBox> {
    if !(radius_km >= 0.0) || !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees();

    let min_lat = lat - lat_delta - BBOX_EPSILON_DEG;
    let max_lat = lat + lat_delta + BBOX_EPSILON_DEG;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    let ratio = angular.sin() / lat.to_radians().cos();
    if !(ratio < 1.0) {
        return None;
    }
    let lon_delta = ratio.asin().to_degrees();

    let min_lon = lon - lon_delta - BBOX_EPSILON_DEG;
    let max_lon = lon + lon_delta + BBOX_EPSILON_DEG;
    if min_lon < -180.0 || max_lon > 180.0 {
        return None;
    }

    Some(BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    })
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lon >= bbox.min_lon && lon <= bbox.max_lon
}
