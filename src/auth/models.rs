//! Authentication request/response models

use serde::{Deserialize, Serialize};

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(alias = "pass")]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
