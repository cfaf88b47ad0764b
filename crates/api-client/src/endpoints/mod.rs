//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of backend endpoints.
//!
//! | Module | Routes |
//! |--------|--------|
//! | `spaces` | `/spaces`, `/spaces/:id`, `/spaces/:id/toplevel-threads` |
//! | `threads` | `/spaces/:id/threads/:id/...` |
//! | `address` | `/address` |
//! | `users` | `/users/:uid` |
//! | `health` | `/healthz` |

pub mod address;
pub mod health;
pub mod spaces;
pub mod threads;
pub mod users;

pub use address::AddressApi;
pub use health::HealthApi;
pub use spaces::{SpacesApi, SpacesNearQuery};
pub use threads::ThreadsApi;
pub use users::UsersApi;
