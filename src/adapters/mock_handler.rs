//! HTTP adapter for mock serving
//!
//! `ANY /mock/:project_id/*path` resolves the request against the project's
//! endpoints and answers with a generated body.

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::adapters::metrics_handler::MetricsCollector;
use crate::adapters::mock_service::{MockPayload, MockService};
use crate::domain::MockError;

/// Response header naming the endpoint that produced the body
pub const ENDPOINT_HEADER: &str = "x-mock-endpoint";

#[derive(Clone)]
pub struct MockState {
    pub service: Arc<MockService>,
    pub metrics: Arc<MetricsCollector>,
}

/// The endpoint path is taken from the raw request URI so that percent
/// escapes such as `%2F` reach the matcher undecoded.
pub async fn serve_mock(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Path((project_id, _)): Path<(String, String)>,
) -> Response {
    respond(&state, method, &project_id, raw_endpoint_path(&uri)).await
}

/// Requests for the project root (`/mock/:project_id`)
pub async fn serve_mock_root(
    State(state): State<MockState>,
    method: Method,
    Path(project_id): Path<String>,
) -> Response {
    respond(&state, method, &project_id, "/").await
}

/// Path below `/mock/{project_id}`, still percent-encoded
fn raw_endpoint_path(uri: &Uri) -> &str {
    let rest = uri.path().strip_prefix("/mock/").unwrap_or_default();
    match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "/",
    }
}

async fn respond(state: &MockState, method: Method, project_id: &str, path: &str) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let timer = Instant::now();
    let result = state.service.serve(project_id, method.as_str(), path).await;
    state
        .metrics
        .generation_duration
        .observe(timer.elapsed().as_secs_f64());

    match result {
        Ok(payload) => {
            tracing::debug!(
                "Served {} {} from endpoint {} with params {:?}",
                method,
                path,
                payload.endpoint_id,
                payload.params
            );
            state
                .metrics
                .mock_requests_total
                .with_label_values(&[method.as_str(), "ok"])
                .inc();
            payload_response(payload)
        }
        Err(e) => {
            let outcome = if e.status_code() == StatusCode::NOT_FOUND {
                "not_found"
            } else {
                "error"
            };
            state
                .metrics
                .mock_requests_total
                .with_label_values(&[method.as_str(), outcome])
                .inc();
            error_response(state, project_id, e)
        }
    }
}

fn payload_response(payload: MockPayload) -> Response {
    let mut response = match payload.body {
        Some(body) => (StatusCode::OK, Json(body)).into_response(),
        None => StatusCode::OK.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(&payload.endpoint_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(ENDPOINT_HEADER), value);
    }
    response
}

fn error_response(state: &MockState, project_id: &str, error: MockError) -> Response {
    match &error {
        MockError::NoMatch { .. } => {
            state.metrics.match_misses.inc();
            tracing::warn!("Project {}: {}", project_id, error);
        }
        MockError::ProjectNotFound(_) | MockError::EndpointNotFound { .. } => {
            tracing::warn!("{}", error);
        }
        _ => {
            state
                .metrics
                .generation_errors
                .with_label_values(&[error.error_type()])
                .inc();
            tracing::error!("Mock generation failed for project {}: {}", project_id, error);
        }
    }

    (
        error.status_code(),
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_endpoint_path() {
        let uri: Uri = "/mock/shop/files/a%2Fb?x=1".parse().unwrap();
        assert_eq!(raw_endpoint_path(&uri), "/files/a%2Fb");

        let uri: Uri = "/mock/my%20shop/".parse().unwrap();
        assert_eq!(raw_endpoint_path(&uri), "/");

        let uri: Uri = "/mock/shop".parse().unwrap();
        assert_eq!(raw_endpoint_path(&uri), "/");
    }
}
