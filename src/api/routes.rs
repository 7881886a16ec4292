//! API routes

use crate::api::handlers::{
    create_user, delete_user, get_user, health_check, list_users, root, update_user, AppState,
};
use crate::auth::handlers::{login, restricted};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/user", post(create_user));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/user", get(list_users))
        .route("/users", get(list_users))
        .route(
            "/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/restricted", get(restricted))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
