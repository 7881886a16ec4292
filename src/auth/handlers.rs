//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::jwt::Claims;
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::core::error::{Result, StonksError};
use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};

/// Handler for POST /login
pub async fn login(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoginRequest>, FormRejection>,
) -> Result<Json<LoginResponse>> {
    // A malformed form reads the same as a wrong password
    let Form(req) = form
        .map_err(|e| StonksError::Unauthorized(format!("Unreadable login form: {}", e.body_text())))?;

    if req.email.is_empty() || req.password.is_empty() {
        return Err(StonksError::Unauthorized("Missing credentials".to_string()));
    }

    let user = state.credentials.verify(&req.email, &req.password).await?;
    let token = state.token_issuer.issue(&user)?;

    tracing::info!(user_id = %user.id, "Login successful");

    Ok(Json(LoginResponse { token }))
}

/// Handler for GET /restricted
pub async fn restricted(claims: Claims) -> String {
    format!("Welcome {}", claims.name)
}
