//! Health check endpoint handler.
//!
//! Talks to the connection pool directly so a broken service layer cannot
//! mask a healthy database or the other way round.

use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::db;
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// Reports service and database health.
///
/// # Responses
/// - `200 OK` - Service is healthy
/// - `503 Service Unavailable` - The database cannot be reached
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;
    let (status, code) = match database.status {
        HealthStatus::Healthy => (HealthStatus::Healthy, StatusCode::OK),
        HealthStatus::Unhealthy => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        database,
    };
    (code, Json(response))
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let result = db::ping(&state.db_pool).await;
    let response_time_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Connected".to_string()),
            response_time_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some("Database unreachable".to_string()),
                response_time_ms,
            }
        }
    }
}
