//! Geospatial math for the Spaces map.
//!
//! This crate provides:
//! - Map viewport (bounding box) computation from a center, radius and aspect ratio
//! - Geofence circle polygons using spherical destination-point offsetting
//! - Haversine distance calculations
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use spaces_geo::{bounding_box, geo_circle, Location};
//!
//! let center = Location::new(52.5200, 13.4050); // Berlin
//!
//! let bbox = bounding_box(center, 100.0, 1.8).unwrap();
//! assert!(bbox.west() < bbox.east());
//!
//! let circle = geo_circle(center, 100.0, 64).unwrap();
//! assert_eq!(circle.vertices().len(), 64);
//! ```

mod circle;
mod error;
mod haversine;
mod viewport;

#[cfg(feature = "wasm")]
mod wasm;

pub use circle::{geo_circle, GeoCircle, MIN_CIRCLE_STEPS};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use viewport::{bounding_box, BoundingBox, METERS_PER_DEGREE_LAT, VIEWPORT_PADDING};

use std::fmt;
use std::str::FromStr;

/// A `[longitude, latitude]` pair, the order used by map SDKs and GeoJSON.
pub type Position = [f64; 2];

/// A geographic location with latitude and longitude in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Location {
    /// Creates a new location.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the location is within the valid degree ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// The `[lon, lat]` position of this location.
    #[inline]
    pub fn position(&self) -> Position {
        [self.longitude, self.latitude]
    }

    /// Wire form used by the `location` query parameter: `"<lon>,<lat>"`.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }

    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }

    pub(crate) fn ensure_finite(&self, what: &str) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(GeoError::invalid_argument(format!(
                "{what} must have finite coordinates, got ({}, {})",
                self.latitude, self.longitude
            )))
        }
    }
}

impl From<(f64, f64)> for Location {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Parses the `"<lon>,<lat>"` wire form.
impl FromStr for Location {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(GeoError::InvalidLocation(format!(
                "expected \"<lon>,<lat>\", got: {s}"
            )));
        }

        let longitude: f64 = parts[0]
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidLocation(format!("invalid longitude: {}", parts[0])))?;
        let latitude: f64 = parts[1]
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidLocation(format!("invalid latitude: {}", parts[1])))?;

        let location = Location::new(latitude, longitude);
        if !location.is_finite() || !location.is_valid() {
            return Err(GeoError::InvalidLocation(format!("out of range: {s}")));
        }

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_creation() {
        let loc = Location::new(52.5200, 13.4050);
        assert_eq!(loc.latitude, 52.5200);
        assert_eq!(loc.longitude, 13.4050);
        assert_eq!(loc.position(), [13.4050, 52.5200]);
    }

    #[test]
    fn test_location_validation() {
        assert!(Location::new(0.0, 0.0).is_valid());
        assert!(Location::new(90.0, 180.0).is_valid());
        assert!(Location::new(-90.0, -180.0).is_valid());
        assert!(!Location::new(91.0, 0.0).is_valid());
        assert!(!Location::new(0.0, 181.0).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_query_value_is_lon_first() {
        let loc = Location::new(48.8566, 2.3522);
        assert_eq!(loc.to_query_value(), "2.3522,48.8566");
        assert_eq!(loc.to_string(), "2.3522,48.8566");
    }

    #[test]
    fn test_parse_location() {
        let loc: Location = "13.405,52.52".parse().unwrap();
        assert_eq!(loc, Location::new(52.52, 13.405));

        let loc: Location = " -74.006 , 40.7128 ".parse().unwrap();
        assert_eq!(loc.longitude, -74.006);
    }

    #[test]
    fn test_parse_location_rejects_garbage() {
        assert!("13.405".parse::<Location>().is_err());
        assert!("a,b".parse::<Location>().is_err());
        assert!("1,2,3".parse::<Location>().is_err());
        assert!("200,10".parse::<Location>().is_err());
        assert!("10,-95".parse::<Location>().is_err());
    }

    #[test]
    fn test_location_from_tuple() {
        let loc: Location = (52.5200, 13.4050).into();
        assert_eq!(loc.latitude, 52.5200);
    }
}
