//! Authentication module
//!
//! This module provides:
//! - Password hashing and verification
//! - Credential verification against the identity store
//! - JWT token issuance and validation
//! - Token middleware for protected routes

pub mod credentials;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use credentials::CredentialVerifier;
pub use handlers::{login, restricted};
pub use jwt::{Claims, TokenIssuer};
pub use middleware::{authenticate, bearer_token};
pub use password::{hash_password, verify_password, PasswordHasher};
