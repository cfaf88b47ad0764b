//! HTTP client for the Spaces backend API
//!
//! This crate provides a typed, resilient client for the Spaces REST API.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load URL and identity token from environment variables
//! - **Envelope unwrapping**: Success bodies are `{"data": ...}`; callers get the payload
//! - **Retry with exponential backoff**: Automatic retry for transient failures
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use spaces_api_client::{ClientConfig, SpacesClient, SpacesNearQuery};
//! use spaces_geo::Location;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpacesClient::with_config(ClientConfig::from_env()?)?;
//!
//!     let query = SpacesNearQuery::new(Location::new(52.52, 13.405)).with_count(Some(11));
//!     for space in client.spaces().near(&query).await? {
//!         println!("{} ({} m)", space.name, space.radius);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod models;
pub mod query;

pub use client::SpacesClient;
pub use config::{ClientConfig, Environment};
pub use endpoints::SpacesNearQuery;
pub use error::{ApiError, ApiResult};
pub use middleware::RetryPolicy;
pub use query::{parse_query, QueryParams};
pub use reqwest::Method;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::SpacesClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{AddressApi, HealthApi, SpacesApi, SpacesNearQuery, ThreadsApi, UsersApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::models::{Address, NewSpace, Sorting, Space, Thread, ThreadPage, User};
}
