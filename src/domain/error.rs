//! Error types for path matching and mock generation

use thiserror::Error;

/// Errors raised while resolving a request or synthesizing its mock body
#[derive(Debug, Error)]
pub enum MockError {
    /// No registered pattern survived matching
    #[error("No endpoint matches {method} {path}")]
    NoMatch { method: String, path: String },

    /// Project is not known to the registry
    #[error("Project not found: '{0}'")]
    ProjectNotFound(String),

    /// Matched pattern id has no endpoint record behind it
    #[error("Endpoint not found: '{endpoint_id}' in project '{project_id}'")]
    EndpointNotFound {
        project_id: String,
        endpoint_id: String,
    },

    /// Path pattern could not be compiled
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Schema node type outside the supported set
    #[error("Unknown schema node type '{node_type}' at '{path}'")]
    UnknownNodeType { node_type: String, path: String },

    /// Array node without an element schema
    #[error("Array node '{path}' has no element schema")]
    MissingElementSchema { path: String },

    /// Two children of one object share a name
    #[error("Duplicate child '{name}' in object '{path}'")]
    DuplicateChildName { name: String, path: String },

    /// Schema nesting deeper than the configured limit
    #[error("Schema depth exceeds limit of {limit} at '{path}'")]
    DepthExceeded { limit: usize, path: String },

    /// Structurally malformed schema document
    #[error("Invalid schema at '{path}': {reason}")]
    InvalidSchema { path: String, reason: String },
}

impl MockError {
    /// Convert to HTTP status code for mock responses
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NoMatch { .. } => StatusCode::NOT_FOUND,
            Self::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::EndpointNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::NoMatch { .. } => "no_match",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::EndpointNotFound { .. } => "endpoint_not_found",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::UnknownNodeType { .. } => "unknown_node_type",
            Self::MissingElementSchema { .. } => "missing_element_schema",
            Self::DuplicateChildName { .. } => "duplicate_child_name",
            Self::DepthExceeded { .. } => "depth_exceeded",
            Self::InvalidSchema { .. } => "invalid_schema",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_family_maps_to_404() {
        let err = MockError::NoMatch {
            method: "GET".to_string(),
            path: "/missing".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            MockError::ProjectNotFound("p1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_schema_errors_map_to_500() {
        let err = MockError::MissingElementSchema {
            path: "root.items".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "missing_element_schema");
        assert_eq!(err.to_string(), "Array node 'root.items' has no element schema");
    }
}
