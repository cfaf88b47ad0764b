//! Location-driven coordination for the Spaces map screen
//!
//! - [`debounce`]: trailing debounce on the tokio timer
//! - [`location`]: watch-backed device location feed
//! - [`query`]: per-query state slots
//! - [`coordinator`]: runs the nearby-spaces and address queries for the current location
//! - [`viewport`]: map bounds recomputed on debounced radius changes
//!
//! # Example
//!
//! ```rust,no_run
//! use spaces_api_client::{ClientConfig, SpacesClient};
//! use spaces_geo::Location;
//! use spaces_nearby::{CoordinatorConfig, NearbyCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpacesClient::with_config(ClientConfig::from_env()?)?;
//!     let nearby = NearbyCoordinator::new(client, CoordinatorConfig::default());
//!
//!     nearby.set_location(Some(Location::new(52.52, 13.405)));
//!     let report = nearby.refresh_all().await;
//!     println!("{report:?}");
//!
//!     nearby.dispose();
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod coordinator;
pub mod debounce;
pub mod location;
pub mod query;
pub mod source;
pub mod viewport;

pub use coordinator::{CoordinatorConfig, NearbyCoordinator, NearbySnapshot, RefreshOutcome, RefreshReport};
pub use debounce::Debouncer;
pub use location::{location_feed, LocationFeed, LocationPublisher, LocationReading};
pub use query::{QueryError, QueryKind, QueryState};
pub use source::NearbySource;
pub use viewport::{MapViewport, ViewportConfig, ViewportState};
