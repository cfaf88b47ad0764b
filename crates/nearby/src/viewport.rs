//! Map camera bounds for the radius picker.
//!
//! Dragging the radius slider fires many updates per second; bounds are
//! recomputed only after the slider has been still for the debounce delay.
//! Moving the center recomputes immediately.

use crate::debounce::Debouncer;
use spaces_core::config::MapConfig;
use spaces_geo::{bounding_box, geo_circle, BoundingBox, GeoCircle, Location, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Width:height of the map surface
    pub aspect_ratio: f64,
    pub circle_steps: usize,
    pub debounce: Duration,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

impl From<&MapConfig> for ViewportConfig {
    fn from(config: &MapConfig) -> Self {
        Self {
            aspect_ratio: config.aspect_ratio,
            circle_steps: config.circle_steps,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

/// Applied center, radius and the bounds derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub center: Location,
    pub radius_m: f64,
    pub bounds: BoundingBox,
}

struct Shared {
    state: watch::Sender<ViewportState>,
    config: ViewportConfig,
}

impl Shared {
    fn apply(&self, center: Location, radius_m: f64) -> Result<()> {
        let bounds = bounding_box(center, radius_m, self.config.aspect_ratio)?;
        self.state.send_replace(ViewportState {
            center,
            radius_m,
            bounds,
        });
        Ok(())
    }
}

/// Debounced viewport state for a map centered on a space or the user.
pub struct MapViewport {
    shared: Arc<Shared>,
    radius: Debouncer<f64>,
}

impl MapViewport {
    pub fn new(center: Location, radius_m: f64, config: ViewportConfig) -> Result<Self> {
        let bounds = bounding_box(center, radius_m, config.aspect_ratio)?;
        let (state, _) = watch::channel(ViewportState {
            center,
            radius_m,
            bounds,
        });
        let shared = Arc::new(Shared { state, config });

        let target = Arc::clone(&shared);
        let radius = Debouncer::new(config.debounce, move |radius_m: f64| {
            let center = target.state.borrow().center;
            match target.apply(center, radius_m) {
                Ok(()) => debug!(radius_m, "viewport recomputed"),
                Err(err) => warn!(radius_m, error = %err, "ignoring radius"),
            }
        });

        Ok(Self { shared, radius })
    }

    pub fn current(&self) -> ViewportState {
        *self.shared.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewportState> {
        self.shared.state.subscribe()
    }

    /// Schedules a recompute with `radius_m` once input has settled.
    ///
    /// The value is not clamped. Must be called from within a Tokio runtime.
    pub fn set_radius(&self, radius_m: f64) {
        self.radius.call(radius_m);
    }

    pub fn has_pending_radius(&self) -> bool {
        self.radius.is_pending()
    }

    /// Recenters immediately, keeping the applied radius.
    pub fn set_center(&self, center: Location) -> Result<()> {
        let radius_m = self.shared.state.borrow().radius_m;
        self.shared.apply(center, radius_m)
    }

    /// Geofence polygon for the applied center and radius, built fresh.
    pub fn geofence(&self) -> Result<GeoCircle> {
        let state = self.current();
        geo_circle(state.center, state.radius_m, self.shared.config.circle_steps)
    }
}
