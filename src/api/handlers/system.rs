use super::AppState;
use crate::api::models::{ComponentHealth, HealthResponse, HealthStatus};
use axum::{extract::State, Json};
use chrono::Utc;

/// Handler for GET / - liveness probe
pub async fn root() -> &'static str {
    "Accessible"
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = check_database_health(&state).await;

    Json(HealthResponse {
        status: database.status,
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn check_database_health(state: &AppState) -> ComponentHealth {
    let probe = state
        .db
        .execute(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
        .await;

    match probe {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Database error: {}", e)),
        },
    }
}
