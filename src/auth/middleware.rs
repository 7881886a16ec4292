//! Token middleware for protected routes

use crate::api::handlers::AppState;
use crate::auth::jwt::Claims;
use crate::core::error::{Result, StonksError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Authentication middleware
///
/// Verifies the bearer token and stores the decoded [`Claims`] in the request
/// extensions. Any failure ends the request with 401 before the handler runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match bearer_token(request.headers()) {
        Some(token) => state.token_issuer.verify(token),
        None => Err(StonksError::Unauthorized(
            "Missing authentication token".to_string(),
        )),
    };

    match claims {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = StonksError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| StonksError::Unauthorized("User not authenticated".to_string()))
    }
}
