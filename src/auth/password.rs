//! Password hashing and verification using bcrypt
//!
//! Both operations run on the blocking pool.

use crate::core::error::{Result, StonksError};

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Salted one-way password hashing with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| StonksError::TaskError(format!("Password hashing panicked: {}", e)))?
    }

    /// Verify a password against a stored hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| StonksError::TaskError(format!("Password verification panicked: {}", e)))?
    }
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| StonksError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| StonksError::Internal(format!("Failed to verify password: {}", e)))
}
