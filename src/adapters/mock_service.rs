use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::mock_generator::{GenerateOptions, MockGenerator};
use crate::adapters::path_matcher::PathMatcher;
use crate::domain::{EndpointRegistry, MockError};

/// A generated mock response
#[derive(Debug, Clone, Serialize)]
pub struct MockPayload {
    pub endpoint_id: String,
    pub params: HashMap<String, String>,
    /// `None` when the schema produced no body
    pub body: Option<Value>,
}

enum RngSource {
    /// Fresh entropy-seeded generator per request
    Entropy,
    /// One seeded sequence shared by every request
    Seeded(Mutex<StdRng>),
}

/// Resolves a request to an endpoint and generates its mock body
pub struct MockService {
    registry: Arc<dyn EndpointRegistry>,
    generator: MockGenerator,
    rng: RngSource,
}

impl MockService {
    pub fn new(
        registry: Arc<dyn EndpointRegistry>,
        options: GenerateOptions,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => RngSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => RngSource::Entropy,
        };
        Self {
            registry,
            generator: MockGenerator::new(options),
            rng,
        }
    }

    pub async fn serve(
        &self,
        project_id: &str,
        method: &str,
        path: &str,
    ) -> Result<MockPayload, MockError> {
        let candidates = self.registry.list_patterns(project_id, method).await?;

        let matched = PathMatcher::match_path(path, method, &candidates).ok_or_else(|| {
            MockError::NoMatch {
                method: method.to_string(),
                path: path.to_string(),
            }
        })?;

        let record = self
            .registry
            .get_endpoint(project_id, &matched.pattern_id)
            .await?;

        let body = self.with_rng(|rng| {
            self.generator
                .generate_document(record.success_schema(), rng)
        })?;

        Ok(MockPayload {
            endpoint_id: record.id,
            params: matched.params,
            body,
        })
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        match &self.rng {
            RngSource::Entropy => f(&mut StdRng::from_entropy()),
            RngSource::Seeded(rng) => {
                let mut guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
                f(&mut *guard)
            }
        }
    }
}
