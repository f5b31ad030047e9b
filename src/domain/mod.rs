use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub mod error;
pub mod schema;

pub use error::MockError;
pub use schema::{
    FakerKind, MockOverride, SchemaKind, SchemaNode, DEFAULT_MAX_DEPTH, MAX_PATTERN_REPEAT,
};

/// Path template registered for one endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndpointPattern {
    pub id: String,
    pub method: String,
    /// '/'-delimited template, e.g. "/users/{id}" or "/reports/report-{year}"
    pub path_pattern: String,
}

/// Outcome of a successful path match
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchResult {
    pub pattern_id: String,
    /// Number of literal segments that matched exactly
    pub weight: usize,
    pub params: HashMap<String, String>,
}

/// Full endpoint definition as held by the registry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointRecord {
    pub id: String,
    pub project_id: String,
    pub method: String,
    pub path: String,
    pub name: Option<String>,
    /// Response schema documents keyed by status code
    pub responses: HashMap<String, Value>,
}

impl EndpointRecord {
    /// Schema document of the "200" response, if one is declared
    pub fn success_schema(&self) -> Option<&Value> {
        self.responses.get("200").filter(|v| !v.is_null())
    }
}

/// Source of endpoint definitions for mock serving
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Patterns registered for a project and method, in registration order
    async fn list_patterns(
        &self,
        project_id: &str,
        method: &str,
    ) -> Result<Vec<EndpointPattern>, MockError>;

    async fn get_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> Result<EndpointRecord, MockError>;

    /// Total number of registered endpoints across all projects
    async fn endpoint_count(&self) -> usize;
}
