//! # Proteus - Schema-driven API Mock Server
//!
//! Proteus serves mock responses for authored API definitions. An inbound
//! request is resolved against the endpoint patterns registered for its
//! project, and a JSON body is synthesized from the matched endpoint's
//! response schema.
//!
//! ## Features
//!
//! - **Path matching**: literal, `{param}` and embedded `report-{year}` segments,
//!   ranked by the number of literal segments matched
//! - **Mock generation**: type-directed random data with required/optional and
//!   array cardinality rules, recorded examples and faker hints
//! - **Reproducible output**: every generator takes an explicit random source
//! - **Metrics**: Prometheus metrics for monitoring
//! - **Health Checks**: Kubernetes-ready health endpoints
//! - **Live Reload**: Automatic configuration reloading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proteus::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     println!("{} endpoints loaded", settings.endpoint_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: endpoint patterns, schema trees, registry port, errors
//! - **Adapters**: path matcher, mock generator, registry, HTTP handlers
//! - **Config**: configuration management

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::mock_handler::{self, MockState};
use crate::adapters::mock_service::MockService;
use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `mock_service` - Resolves requests and generates mock bodies
/// * `health_handler` - Health check handler
/// * `metrics` - Metrics collector shared with the mock handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(
    mock_service: Arc<MockService>,
    health_handler: Arc<HealthHandler>,
    metrics: Arc<MetricsCollector>,
) -> Router {
    let metrics_handler = Arc::new(MetricsHandler::new(metrics.clone()));

    let system_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let handler = metrics_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.metrics().await }
            }
        }));

    let mock_state = MockState {
        service: mock_service,
        metrics,
    };
    let mock_router = Router::new()
        .route("/mock/:project_id", any(mock_handler::serve_mock_root))
        .route("/mock/:project_id/*path", any(mock_handler::serve_mock))
        .with_state(mock_state);

    system_router.merge(mock_router).layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
