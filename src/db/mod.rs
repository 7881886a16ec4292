//! Database module
//!
//! This module provides:
//! - Database connection pool management
//! - The identity store contract and its SQLite implementation
//! - Database migrations
//! - Data models and filters

pub mod filter;
pub mod manager;
pub mod migrations;
pub mod models;
pub mod repository;

pub use filter::{FilterValue, UserField, UserFilter};
pub use manager::DatabaseManager;
pub use models::{DeleteOutcome, NewUser, UpdateOutcome, User, UserPatch};
pub use repository::{UserRepository, UserStore};
