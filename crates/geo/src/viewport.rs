//! Map viewport computation.
//!
//! Converts a center, a radius in meters and a width:height aspect ratio
//! into the rectangle a map camera should frame. This is a flat-degree
//! approximation and intentionally not geodesic; see [`crate::geo_circle`]
//! for the polygon drawn inside it.

use crate::{GeoError, Location, Position, Result};
use serde::{Deserialize, Serialize};

/// Approximate meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Padding factor applied around the radius (50% beyond the bare radius).
pub const VIEWPORT_PADDING: f64 = 1.5;

/// Rectangular viewport defined by its southwest and northeast corners.
///
/// Serializes as `{"sw": [lon, lat], "ne": [lon, lat]}`, the form accepted
/// by the map camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// `[west, south]`
    #[serde(rename = "sw")]
    pub southwest: Position,
    /// `[east, north]`
    #[serde(rename = "ne")]
    pub northeast: Position,
}

impl BoundingBox {
    #[inline]
    pub fn west(&self) -> f64 {
        self.southwest[0]
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.southwest[1]
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.northeast[0]
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.northeast[1]
    }

    /// Longitudinal extent in degrees.
    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    /// Latitudinal extent in degrees.
    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Location {
        Location::new(
            (self.north() + self.south()) / 2.0,
            (self.east() + self.west()) / 2.0,
        )
    }

    /// True when the box has no area, i.e. it is not a usable viewport.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Returns true if the location lies inside or on the edge of the box.
    pub fn contains(&self, location: &Location) -> bool {
        location.latitude >= self.south()
            && location.latitude <= self.north()
            && location.longitude >= self.west()
            && location.longitude <= self.east()
    }
}

/// Computes the map viewport around `center`.
///
/// The north/south span is `radius_m / 111000 * 1.5` degrees on either side.
/// The east/west span is that value times `aspect_ratio`, divided by
/// `cos(latitude)` to compensate for meridian convergence.
///
/// Preconditions: `|center.latitude| < 90`. At the poles the cosine goes to
/// zero and east/west become unbounded. A `radius_m <= 0` produces a
/// degenerate box, which is returned as-is.
///
/// # Errors
/// [`GeoError::InvalidArgument`] if any input is NaN or infinite.
///
/// # Example
/// ```
/// use spaces_geo::{bounding_box, Location};
///
/// let bbox = bounding_box(Location::new(0.0, 0.0), 111_000.0, 1.0).unwrap();
/// assert!((bbox.north() - 1.5).abs() < 1e-9);
/// assert!((bbox.east() - 1.5).abs() < 1e-9);
/// ```
pub fn bounding_box(center: Location, radius_m: f64, aspect_ratio: f64) -> Result<BoundingBox> {
    center.ensure_finite("center")?;
    if !radius_m.is_finite() {
        return Err(GeoError::invalid_argument(format!(
            "radius must be finite, got {radius_m}"
        )));
    }
    if !aspect_ratio.is_finite() {
        return Err(GeoError::invalid_argument(format!(
            "aspect ratio must be finite, got {aspect_ratio}"
        )));
    }

    let Location { latitude, longitude } = center;
    let deg_lat = (radius_m / METERS_PER_DEGREE_LAT) * VIEWPORT_PADDING;
    let deg_lon = deg_lat * aspect_ratio;

    let north = latitude + deg_lat;
    let south = latitude - deg_lat;

    let lon_scale = latitude.to_radians().cos();
    let east = longitude + deg_lon / lon_scale;
    let west = longitude - deg_lon / lon_scale;

    Ok(BoundingBox {
        southwest: [west, south],
        northeast: [east, north],
    })
}
