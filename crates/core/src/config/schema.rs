//! Configuration schema definitions

use crate::validation::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub nearby: NearbyConfig,
}

impl ConfigSchema {
    /// Check every section, collecting all violations
    pub fn validate(&self) -> ValidationResult {
        Validator::new()
            .custom("api.base_url", || {
                let url = self.api.base_url.as_str();
                (!url.starts_with("http://") && !url.starts_with("https://"))
                    .then(|| "Must start with http:// or https://".to_string())
            })
            .range("api.timeout_secs", self.api.timeout_secs, 1, 300)
            .finite("map.aspect_ratio", self.map.aspect_ratio)
            .custom("map.aspect_ratio", || {
                (self.map.aspect_ratio <= 0.0).then(|| "Must be positive".to_string())
            })
            .range("map.circle_steps", self.map.circle_steps, 3, 4096)
            .custom("map.max_radius_m", || {
                (self.map.min_radius_m > self.map.max_radius_m)
                    .then(|| "Must not be below map.min_radius_m".to_string())
            })
            .custom("nearby.search_radius_m", || {
                (!(self.nearby.search_radius_m > 0.0)).then(|| "Must be positive".to_string())
            })
            .validate()
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL including the API version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Map viewport and geofence rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Width:height ratio of the map surface
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,

    /// Vertices used for geofence circles
    #[serde(default = "default_circle_steps")]
    pub circle_steps: usize,

    /// Quiet period before a radius change recomputes the viewport
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Smallest radius offered by the radius slider
    #[serde(default = "default_min_radius_m")]
    pub min_radius_m: f64,

    /// Largest radius a space may have
    #[serde(default = "default_max_radius_m")]
    pub max_radius_m: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            circle_steps: default_circle_steps(),
            debounce_ms: default_debounce_ms(),
            min_radius_m: default_min_radius_m(),
            max_radius_m: default_max_radius_m(),
        }
    }
}

fn default_aspect_ratio() -> f64 {
    1.8
}

fn default_circle_steps() -> usize {
    64
}

fn default_debounce_ms() -> u64 {
    40
}

fn default_min_radius_m() -> f64 {
    10.0
}

fn default_max_radius_m() -> f64 {
    100.0
}

/// Nearby-spaces query configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyConfig {
    /// Search radius sent with the spaces query, in meters
    #[serde(default = "default_search_radius_m")]
    pub search_radius_m: f64,

    /// Result cap sent as `count`; `None` leaves the query uncapped
    #[serde(default = "default_result_cap")]
    pub result_cap: Option<u32>,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            search_radius_m: default_search_radius_m(),
            result_cap: default_result_cap(),
        }
    }
}

fn default_search_radius_m() -> f64 {
    500.0
}

#[allow(clippy::unnecessary_wraps)]
fn default_result_cap() -> Option<u32> {
    Some(11)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.map.aspect_ratio, 1.8);
        assert_eq!(schema.map.debounce_ms, 40);
        assert_eq!(schema.nearby.result_cap, Some(11));
        assert!(schema.validate().is_valid());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [map]
            circle_steps = 32

            [nearby]
            search_radius_m = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(schema.map.circle_steps, 32);
        assert_eq!(schema.map.aspect_ratio, 1.8);
        assert_eq!(schema.nearby.search_radius_m, 250.0);
        assert_eq!(schema.api, ApiConfig::default());
    }

    #[test]
    fn test_validation_collects_violations() {
        let mut schema = ConfigSchema::default();
        schema.api.base_url = "ftp://nope".to_string();
        schema.map.circle_steps = 2;
        schema.map.min_radius_m = 500.0;

        let result = schema.validate();
        let fields: Vec<&str> = result.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["api.base_url", "map.circle_steps", "map.max_radius_m"]);
    }
}
