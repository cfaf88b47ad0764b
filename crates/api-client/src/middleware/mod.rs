//! Request middleware
//!
//! Currently only the retry policy applied around every request.

pub mod retry;

pub use retry::RetryPolicy;
