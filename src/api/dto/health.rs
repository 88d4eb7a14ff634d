//! `GET /health` body.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall status plus the database probe it was derived from.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub database: ComponentHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a single dependency probe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[schema(example = "Connected")]
    pub message: Option<String>,
    /// Probe round trip
    #[schema(example = 1)]
    pub response_time_ms: Option<u64>,
}
