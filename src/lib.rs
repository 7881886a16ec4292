//! fatstonks: a small user-record service
//!
//! Users register, log in with email and password, and receive a short-lived
//! signed token that unlocks the protected record endpoints.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::{Config, StonksError};
pub use api::{ApiServer, AppState};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
