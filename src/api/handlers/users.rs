use super::AppState;
use crate::api::models::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::core::error::{Result, StonksError};
use crate::db::models::{DeleteOutcome, UpdateOutcome};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|e| StonksError::BadRequest(e.body_text()))
}

/// Handler for POST /user - Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = json_body(body)?;
    let user = state.user_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Handler for GET /user and GET /users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler for GET /user/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Handler for PUT /user/:id - Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdateOutcome>> {
    let req = json_body(body)?;
    let outcome = state.user_service.update(&id, req).await?;
    Ok(Json(outcome))
}

/// Handler for DELETE /user/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>> {
    let outcome = state.user_service.delete(&id).await?;
    Ok(Json(outcome))
}
