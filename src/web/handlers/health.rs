//! # Health Check Handler
//!
//! Liveness endpoint for process supervision and load balancers.

use axum::Json;
use serde::Serialize;

/// Basic health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

/// Basic liveness check: GET /health
///
/// Always returns `200 {"status":"ok"}` while the listener is up. Has no
/// dependency on registry state or configuration.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
