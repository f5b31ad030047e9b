use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::EndpointRegistry;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub endpoints: usize,
}

pub struct HealthHandler {
    registry: Arc<dyn EndpointRegistry>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(registry: Arc<dyn EndpointRegistry>) -> Self {
        Self {
            registry,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            endpoints: self.registry.endpoint_count().await,
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - ready once at least one endpoint is registered
    pub async fn ready(&self) -> impl IntoResponse {
        if self.registry.endpoint_count().await > 0 {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Server is ready to serve mocks"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "No endpoints registered"
            })))
        }
    }

    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}
