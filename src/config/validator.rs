use std::collections::HashMap;
use thiserror::Error;

use crate::adapters::path_matcher::CompiledPattern;
use crate::config::{EndpointConfig, MockSettings, ProjectConfig, Settings};
use crate::domain::SchemaNode;

const KNOWN_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_mock(&settings.mock) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_projects(&settings.projects, settings.mock.max_depth) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &crate::config::ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_mock(mock: &MockSettings) -> Result<(), Vec<ValidationError>> {
        if mock.max_depth == 0 {
            return Err(vec![ValidationError::InvalidValue {
                field: "mock.max_depth".to_string(),
                reason: "Depth limit must be greater than 0".to_string(),
            }]);
        }
        Ok(())
    }

    fn validate_projects(
        projects: &[ProjectConfig],
        max_depth: usize,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, project) in projects.iter().enumerate() {
            if let Some(prev_idx) = seen_ids.insert(&project.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Project id '{}' appears at indices {} and {}",
                    project.id, prev_idx, idx
                )));
            }

            if project.id.is_empty() {
                errors.push(ValidationError::MissingField(format!("projects[{}].id", idx)));
            }

            if let Err(e) = Self::validate_endpoints(idx, &project.endpoints, max_depth) {
                errors.extend(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_endpoints(
        project_idx: usize,
        endpoints: &[EndpointConfig],
        max_depth: usize,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, endpoint) in endpoints.iter().enumerate() {
            let field = format!("projects[{}].endpoints[{}]", project_idx, idx);

            if let Some(prev_idx) = seen_ids.insert(&endpoint.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Endpoint id '{}' appears at indices {} and {} of projects[{}]",
                    endpoint.id, prev_idx, idx, project_idx
                )));
            }

            if endpoint.id.is_empty() {
                errors.push(ValidationError::MissingField(format!("{}.id", field)));
            }

            if !KNOWN_METHODS
                .iter()
                .any(|m| m.eq_ignore_ascii_case(&endpoint.method))
            {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.method", field),
                    reason: format!("Unknown HTTP method '{}'", endpoint.method),
                });
            }

            if !endpoint.path.starts_with('/') {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.path", field),
                    reason: format!("Path pattern '{}' must start with '/'", endpoint.path),
                });
            } else if let Err(e) = CompiledPattern::compile(&endpoint.path) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.path", field),
                    reason: e.to_string(),
                });
            }

            for (status, schema) in &endpoint.responses {
                if schema.is_null() {
                    continue;
                }
                if let Err(e) = SchemaNode::from_value(schema, max_depth) {
                    errors.push(ValidationError::InvalidValue {
                        field: format!("{}.responses.{}", field, status),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerSettings, Settings};
    use serde_json::json;

    fn settings_with(endpoints: Vec<EndpointConfig>) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            mock: MockSettings::default(),
            projects: vec![ProjectConfig {
                id: "shop".to_string(),
                name: Some("Shop".to_string()),
                endpoints,
            }],
        }
    }

    fn endpoint(id: &str, method: &str, path: &str) -> EndpointConfig {
        EndpointConfig {
            id: id.to_string(),
            project_id: None,
            method: method.to_string(),
            path: path.to_string(),
            name: None,
            description: None,
            responses: HashMap::from([(
                "200".to_string(),
                json!({ "type": "object", "children": [{ "name": "id", "type": "int" }] }),
            )]),
        }
    }

    #[test]
    fn test_valid_config() {
        let settings = settings_with(vec![
            endpoint("list", "GET", "/items"),
            endpoint("get", "get", "/items/{id}"),
        ]);
        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut settings = settings_with(vec![]);
        settings.server.port = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_duplicate_endpoint_ids() {
        let settings = settings_with(vec![
            endpoint("same", "GET", "/a"),
            endpoint("same", "GET", "/b"),
        ]);
        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Duplicate(_))));
    }

    #[test]
    fn test_bad_method_and_path() {
        let settings = settings_with(vec![endpoint("x", "FETCH", "items")]);
        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_invalid_schema_reported() {
        let mut ep = endpoint("x", "GET", "/x");
        ep.responses
            .insert("200".to_string(), json!({ "type": "array" }));
        let errors = ConfigValidator::validate(&settings_with(vec![ep])).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("no element schema")));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut settings = settings_with(vec![]);
        settings.mock.max_depth = 0;
        assert!(ConfigValidator::validate(&settings).is_err());
    }
}
