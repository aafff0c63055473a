//! Health check handler for service monitoring.
//!
//! Returns a fixed payload identifying the service. The endpoint is
//! stateless and independent of the output directory, so it stays green
//! as long as the process is serving requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "social-rl-data-server";

/// Fixed health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process is serving requests
    pub status: &'static str,
    /// Service identifier
    pub service: &'static str,
}

/// Health check endpoint handler.
///
/// Designed to be called frequently by monitors and load balancers, so it
/// performs no I/O and touches no shared state.
#[instrument(name = "health_check")]
pub async fn health_check() -> Response {
    debug!("Health check");

    (StatusCode::OK, Json(HealthResponse { status: "healthy", service: SERVICE_NAME }))
        .into_response()
}
