//! Geofence circle polygons.
//!
//! Vertices are placed by spherical destination-point offsetting from the
//! center, so every vertex is exactly `radius_m` away on the great circle.
//! The first vertex is due north and the ring proceeds counterclockwise.

use crate::{GeoError, Location, Position, Result, EARTH_RADIUS_M};
use serde::Serialize;

/// Fewest vertices that still form a polygon.
pub const MIN_CIRCLE_STEPS: usize = 3;

/// Polygon approximating a circle around a center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCircle {
    center: Location,
    radius_m: f64,
    vertices: Vec<Position>,
}

impl GeoCircle {
    pub fn center(&self) -> Location {
        self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// The `steps` distinct vertices as `[lon, lat]`.
    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    /// Vertices with the first one repeated at the end (`steps + 1` positions).
    pub fn closed_ring(&self) -> Vec<Position> {
        let mut ring = Vec::with_capacity(self.vertices.len() + 1);
        ring.extend_from_slice(&self.vertices);
        if let Some(first) = self.vertices.first() {
            ring.push(*first);
        }
        ring
    }

    /// GeoJSON `Feature` with a `Polygon` geometry, ready for a map shape source.
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "radius": self.radius_m,
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [self.closed_ring()],
            },
        })
    }
}

/// Builds a circle polygon of `radius_m` meters around `center` with `steps` vertices.
///
/// # Errors
/// [`GeoError::InvalidArgument`] if `steps < 3`, if the radius is negative,
/// or if any input is non-finite.
///
/// # Example
/// ```
/// use spaces_geo::{geo_circle, haversine_distance_meters, Location};
///
/// let center = Location::new(40.7128, -74.0060);
/// let circle = geo_circle(center, 100.0, 32).unwrap();
///
/// for [lon, lat] in circle.vertices() {
///     let d = haversine_distance_meters(&center, &Location::new(*lat, *lon));
///     assert!((d - 100.0).abs() < 1e-6);
/// }
/// ```
pub fn geo_circle(center: Location, radius_m: f64, steps: usize) -> Result<GeoCircle> {
    if steps < MIN_CIRCLE_STEPS {
        return Err(GeoError::invalid_argument(format!(
            "steps must be at least {MIN_CIRCLE_STEPS}, got {steps}"
        )));
    }
    center.ensure_finite("center")?;
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(GeoError::invalid_argument(format!(
            "radius must be a finite, non-negative number of meters, got {radius_m}"
        )));
    }

    let vertices = (0..steps)
        .map(|i| {
            let bearing = (i as f64 * -360.0) / steps as f64;
            destination(&center, radius_m, bearing)
        })
        .collect();

    Ok(GeoCircle {
        center,
        radius_m,
        vertices,
    })
}

/// Point reached by travelling `distance_m` from `origin` along `bearing_deg`.
fn destination(origin: &Location, distance_m: f64, bearing_deg: f64) -> Position {
    let (lat1, lon1) = origin.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    [lon2.to_degrees(), lat2.to_degrees()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance_meters;
    use proptest::prelude::*;

    #[test]
    fn test_vertex_count_and_closed_ring() {
        let circle = geo_circle(Location::new(52.52, 13.405), 50.0, 16).unwrap();
        assert_eq!(circle.vertices().len(), 16);

        let ring = circle.closed_ring();
        assert_eq!(ring.len(), 17);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_first_vertex_is_due_north() {
        let center = Location::new(10.0, 20.0);
        let circle = geo_circle(center, 1000.0, 8).unwrap();
        let [lon, lat] = circle.vertices()[0];
        assert!((lon - 20.0).abs() < 1e-9);
        assert!(lat > 10.0);
    }

    #[test]
    fn test_too_few_steps_rejected() {
        let center = Location::new(0.0, 0.0);
        assert!(matches!(
            geo_circle(center, 10.0, 2),
            Err(GeoError::InvalidArgument(_))
        ));
        assert!(geo_circle(center, 10.0, 0).is_err());
        assert!(geo_circle(center, 10.0, 3).is_ok());
    }

    #[test]
    fn test_bad_radius_rejected() {
        let center = Location::new(0.0, 0.0);
        assert!(geo_circle(center, -1.0, 8).is_err());
        assert!(geo_circle(center, f64::NAN, 8).is_err());
        assert!(geo_circle(Location::new(0.0, f64::INFINITY), 10.0, 8).is_err());
    }

    #[test]
    fn test_zero_radius_collapses_to_center() {
        let center = Location::new(-33.8688, 151.2093);
        let circle = geo_circle(center, 0.0, 4).unwrap();
        for [lon, lat] in circle.vertices() {
            assert!((lon - center.longitude).abs() < 1e-9);
            assert!((lat - center.latitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_geojson_shape() {
        let circle = geo_circle(Location::new(0.0, 0.0), 25.0, 6).unwrap();
        let geojson = circle.to_geojson();
        assert_eq!(geojson["type"], "Feature");
        assert_eq!(geojson["geometry"]["type"], "Polygon");
        assert_eq!(geojson["geometry"]["coordinates"][0].as_array().unwrap().len(), 7);
    }

    proptest! {
        #[test]
        fn prop_vertices_lie_on_radius(
            lat in -80.0f64..80.0,
            lon in -179.0f64..179.0,
            radius in 1.0f64..100_000.0,
            steps in 3usize..128,
        ) {
            let center = Location::new(lat, lon);
            let circle = geo_circle(center, radius, steps).unwrap();
            prop_assert_eq!(circle.vertices().len(), steps);

            for [vlon, vlat] in circle.vertices() {
                let d = haversine_distance_meters(&center, &Location::new(*vlat, *vlon));
                prop_assert!((d - radius).abs() < 1e-6 * radius + 1e-6, "d = {}, r = {}", d, radius);
            }
        }
    }
}
