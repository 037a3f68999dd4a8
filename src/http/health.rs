//! Health check and metrics endpoint handlers

use crate::service::health::{HealthCheck, HealthStatus};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Root endpoint handler - shows service information
pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = json!({
        "service": state.config().service.name,
        "version": crate::VERSION,
        "endpoints": [
            "/health",
            "/alive",
            "/metrics",
            "/players",
            "/teams",
            "/ladders",
            "/matches"
        ]
    });

    Json(info)
}

/// Health check endpoint handler
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    match HealthCheck::check(state.as_ref()).await {
        Ok(report) => {
            let status_code = match report.status {
                HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (
                status_code,
                Json(json!({
                    "status": report.status.to_string(),
                    "version": crate::VERSION,
                    "stats": report.stats,
                })),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "version": crate::VERSION,
                "error": e.to_string(),
            })),
        ),
    }
}

/// Liveness probe handler
pub async fn alive_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics().set_uptime(state.uptime().as_secs());

    match state.metrics().render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        )
            .into_response(),
    }
}
