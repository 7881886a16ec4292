use crate::db::models::User;
use serde::{Deserialize, Serialize};

// User record API models

/// Request body for POST /user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub age: i64,
}

/// Request body for PUT /user/:id
///
/// Absent fields are left unchanged. An empty `username` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
}

/// User record as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: u32,
    pub admin: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            firstname: user.first_name,
            lastname: user.last_name,
            email: user.email,
            age: user.age,
            admin: user.admin,
            created_at: user.created_at,
        }
    }
}
