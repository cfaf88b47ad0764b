//! WASM bindings for the geo crate.
//!
//! Lets the map screens call the viewport and geofence math from
//! JavaScript/TypeScript. Values cross the boundary as JSON strings.

use crate::{bounding_box, geo_circle, haversine_distance_meters, Location};
use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Compute the camera bounds for a center, radius and aspect ratio.
///
/// # Returns
/// JSON string `{"sw": [lon, lat], "ne": [lon, lat]}`
#[wasm_bindgen(js_name = getBoundingBox)]
pub fn get_bounding_box(
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    aspect_ratio: f64,
) -> Result<String, JsValue> {
    let bbox = bounding_box(Location::new(latitude, longitude), radius_m, aspect_ratio)
        .map_err(to_js_error)?;
    serde_json::to_string(&bbox).map_err(to_js_error)
}

/// Build a GeoJSON circle feature of `radius_m` meters with `steps` vertices.
///
/// # Returns
/// JSON string of a GeoJSON `Feature<Polygon>`
#[wasm_bindgen(js_name = createGeoJSONCircle)]
pub fn create_geojson_circle(
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    steps: u32,
) -> Result<String, JsValue> {
    let circle = geo_circle(Location::new(latitude, longitude), radius_m, steps as usize)
        .map_err(to_js_error)?;
    Ok(circle.to_geojson().to_string())
}

/// Distance in meters between two locations.
#[wasm_bindgen]
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance_meters(&Location::new(lat1, lng1), &Location::new(lat2, lng2))
}

/// Parse a `"<lon>,<lat>"` string into `{"latitude": .., "longitude": ..}`.
#[wasm_bindgen]
pub fn parse_location(value: &str) -> Result<String, JsValue> {
    let location: Location = value.parse().map_err(to_js_error)?;
    serde_json::to_string(&location).map_err(to_js_error)
}
