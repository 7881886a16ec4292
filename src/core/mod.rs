//! Core business logic module
//!
//! This module provides the core application layer including:
//! - The user record service
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;
pub mod services;

pub use config::Config;
pub use error::{ErrorContext, Result, StonksError};
pub use logging::Logger;
pub use services::UserService;
