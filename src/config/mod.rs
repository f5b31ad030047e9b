use config::{Config, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub mod validator;
pub mod watcher;

use crate::adapters::mock_generator::GenerateOptions;
use crate::cli::Cli;
use crate::domain::{EndpointPattern, EndpointRecord, DEFAULT_MAX_DEPTH};

/// Directory (relative to the config root) holding one endpoint per file
pub const ENDPOINTS_DIR: &str = "config/endpoints";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub mock: MockSettings,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Mock generation settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MockSettings {
    /// Serve recorded examples for string nodes that have one
    #[serde(default = "default_use_recorded_example")]
    pub use_recorded_example: bool,
    /// Maximum schema nesting accepted before generation fails
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Fixed seed for reproducible mock bodies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_use_recorded_example() -> bool {
    true
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            use_recorded_example: default_use_recorded_example(),
            max_depth: default_max_depth(),
            seed: None,
        }
    }
}

impl MockSettings {
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            use_recorded_example: self.use_recorded_example,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

/// A single API definition served by the mock engine
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EndpointConfig {
    pub id: String,
    /// Owning project; only needed for endpoints loaded from standalone files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub method: String,
    /// Path pattern, e.g. "/users/{id}"
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Response schema documents keyed by status code ("200", "404", ...)
    #[serde(default)]
    pub responses: HashMap<String, Value>,
}

impl EndpointConfig {
    pub fn pattern(&self) -> EndpointPattern {
        EndpointPattern {
            id: self.id.clone(),
            method: self.method.clone(),
            path_pattern: self.path.clone(),
        }
    }

    pub fn to_record(&self, project_id: &str) -> EndpointRecord {
        EndpointRecord {
            id: self.id.clone(),
            project_id: project_id.to_string(),
            method: self.method.clone(),
            path: self.path.clone(),
            name: self.name.clone(),
            responses: self.responses.clone(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let s = Self::builder(File::from(config_path.clone()).required(false))?;
        let mut settings: Settings = s.try_deserialize()?;

        // CLI (and its env fallbacks) > config file
        settings.apply_cli_overrides(cli);

        settings.load_external_configs(root)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("proteus");
        let s = Self::builder(File::from(config_path).required(false))?;
        let mut settings: Settings = s.try_deserialize()?;

        settings.load_external_configs(root)?;
        settings.validate()?;

        Ok(settings)
    }

    fn builder<S>(source: S) -> Result<Config, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(seed) = cli.seed {
            self.mock.seed = Some(seed);
        }
        if let Some(max_depth) = cli.max_depth {
            self.mock.max_depth = max_depth;
        }
        if cli.no_recorded_examples {
            self.mock.use_recorded_example = false;
        }
    }

    fn load_external_configs(&mut self, root: &str) -> Result<(), anyhow::Error> {
        self.load_endpoints_from_dir(&format!("{}/{}", root, ENDPOINTS_DIR))
    }

    fn load_endpoints_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        let mut files: Vec<std::path::PathBuf> = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        // Registration order follows file name order
        files.sort();

        for path in files {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !matches!(ext, "json" | "yaml" | "yml" | "toml") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let endpoint: EndpointConfig = match ext {
                "json" => serde_json::from_str(&content)?,
                "toml" => toml::from_str(&content)?,
                _ => serde_yaml::from_str(&content)?,
            };
            let project_id = endpoint.project_id.clone().ok_or_else(|| {
                anyhow::anyhow!("Endpoint file {} is missing 'project_id'", path.display())
            })?;
            tracing::debug!("Loaded endpoint {} from {}", endpoint.id, path.display());
            self.add_endpoint(&project_id, endpoint);
        }
        Ok(())
    }

    /// Register an endpoint under `project_id`, creating the project if needed
    pub fn add_endpoint(&mut self, project_id: &str, endpoint: EndpointConfig) {
        match self.projects.iter_mut().find(|p| p.id == project_id) {
            Some(project) => project.endpoints.push(endpoint),
            None => self.projects.push(ProjectConfig {
                id: project_id.to_string(),
                name: None,
                endpoints: vec![endpoint],
            }),
        }
    }

    pub fn project(&self, project_id: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn endpoint_count(&self) -> usize {
        self.projects.iter().map(|p| p.endpoints.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings() -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            mock: MockSettings::default(),
            projects: vec![],
        }
    }

    fn endpoint(id: &str, path: &str) -> EndpointConfig {
        EndpointConfig {
            id: id.to_string(),
            project_id: None,
            method: "GET".to_string(),
            path: path.to_string(),
            name: None,
            description: None,
            responses: HashMap::new(),
        }
    }

    #[test]
    fn test_add_endpoint_creates_project() {
        let mut settings = settings();
        settings.add_endpoint("shop", endpoint("list", "/items"));
        settings.add_endpoint("shop", endpoint("get", "/items/{id}"));
        settings.add_endpoint("blog", endpoint("posts", "/posts"));

        assert_eq!(settings.projects.len(), 2);
        assert_eq!(settings.project("shop").unwrap().endpoints.len(), 2);
        assert_eq!(settings.endpoint_count(), 3);
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = settings();
        let cli = Cli::parse_from([
            "proteus",
            "--port",
            "8080",
            "--seed",
            "7",
            "--no-recorded-examples",
        ]);
        settings.apply_cli_overrides(&cli);

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.mock.seed, Some(7));
        assert!(!settings.mock.use_recorded_example);
        assert_eq!(settings.mock.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_endpoint_record_keeps_responses() {
        let mut ep = endpoint("get", "/items/{id}");
        ep.responses
            .insert("200".to_string(), serde_json::json!({ "type": "string" }));
        let record = ep.to_record("shop");
        assert_eq!(record.project_id, "shop");
        assert!(record.success_schema().is_some());
        assert_eq!(ep.pattern().path_pattern, "/items/{id}");
    }
}
