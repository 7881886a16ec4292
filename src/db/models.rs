//! Database models
//!
//! Data structures representing the `users` table and the inputs and
//! outcomes of the identity store operations.

use serde::{Deserialize, Serialize};

/// User record in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub age: u32,
    pub admin: bool,
    pub created_at: String,
}

/// A user record that has not been stored yet; the store assigns `id` and
/// `created_at` on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub age: u32,
    pub admin: bool,
}

/// Partial replacement of the mutable attributes of a user.
///
/// `None` leaves the stored value untouched. `username: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<Option<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<u32>,
}

impl UserPatch {
    /// Apply the patch to a record, returning whether anything changed
    pub fn apply(&self, user: &mut User) -> bool {
        let before = user.clone();

        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(age) = self.age {
            user.age = age;
        }

        *user != before
    }
}

/// Outcome of an update, mirroring what a document store reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}
