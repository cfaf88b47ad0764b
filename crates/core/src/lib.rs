//! Core utilities shared by the Spaces crates
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Validation**: declarative constraints that return a list of violations
//! - **Configuration**: TOML configuration with defaults and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use spaces_core::config::Config;
//!
//! let config = Config::load(None).expect("valid configuration");
//! println!("API: {}", config.schema.api.base_url);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{exit_codes, Error, ErrorCode, ErrorReport, Result};
