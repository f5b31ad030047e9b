use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Settings;
use crate::domain::{EndpointPattern, EndpointRecord, EndpointRegistry, MockError};

/// Registry backed by the live (reloadable) settings
pub struct InMemoryEndpointRegistry {
    settings: Arc<RwLock<Settings>>,
}

impl InMemoryEndpointRegistry {
    pub fn new(settings: Arc<RwLock<Settings>>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EndpointRegistry for InMemoryEndpointRegistry {
    async fn list_patterns(
        &self,
        project_id: &str,
        method: &str,
    ) -> Result<Vec<EndpointPattern>, MockError> {
        let settings = self.settings.read().await;
        let project = settings
            .project(project_id)
            .ok_or_else(|| MockError::ProjectNotFound(project_id.to_string()))?;

        Ok(project
            .endpoints
            .iter()
            .filter(|e| e.method.eq_ignore_ascii_case(method))
            .map(|e| e.pattern())
            .collect())
    }

    async fn get_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> Result<EndpointRecord, MockError> {
        let settings = self.settings.read().await;
        settings
            .project(project_id)
            .ok_or_else(|| MockError::ProjectNotFound(project_id.to_string()))?
            .endpoints
            .iter()
            .find(|e| e.id == endpoint_id)
            .map(|e| e.to_record(project_id))
            .ok_or_else(|| MockError::EndpointNotFound {
                project_id: project_id.to_string(),
                endpoint_id: endpoint_id.to_string(),
            })
    }

    async fn endpoint_count(&self) -> usize {
        self.settings.read().await.endpoint_count()
    }
}
