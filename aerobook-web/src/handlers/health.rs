//! Health check and landing handlers

use axum::response::Json;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Landing endpoint; the interactive redirects point here
pub async fn landing() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "aerobook",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
