//! Haversine distance calculation.
//!
//! Great-circle distance on a sphere. Used to order spaces by proximity and
//! as the reference metric for geofence circle vertices.

use crate::Location;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two locations in kilometers.
///
/// # Example
/// ```
/// use spaces_geo::{haversine_distance, Location};
///
/// let berlin = Location::new(52.5200, 13.4050);
/// let paris = Location::new(48.8566, 2.3522);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Location, to: &Location) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_KM
}

/// Calculates the great-circle distance between two locations in meters.
#[inline]
pub fn haversine_distance_meters(from: &Location, to: &Location) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_M
}

/// Angle subtended at the sphere's center, in radians.
#[inline]
fn central_angle(from: &Location, to: &Location) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}
