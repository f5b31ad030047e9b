use proteus::adapters::{
    endpoint_registry::InMemoryEndpointRegistry, health_handler::HealthHandler,
    metrics_handler::MetricsCollector, mock_service::MockService,
};
use proteus::config::{EndpointConfig, MockSettings, ServerSettings, Settings};
use proteus::domain::EndpointRegistry;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    pub async fn new() -> Self {
        let mut settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            mock: MockSettings::default(),
            projects: vec![],
        };
        settings.add_endpoint(
            "demo",
            EndpointConfig {
                id: "get-order".to_string(),
                project_id: None,
                method: "GET".to_string(),
                path: "/orders/{order_id}".to_string(),
                name: Some("Get order".to_string()),
                description: None,
                responses: HashMap::from([(
                    "200".to_string(),
                    json!({
                        "type": "object", "required": true,
                        "children": [
                            { "name": "order_id", "type": "string", "required": true,
                              "mock": { "faker": "uuid" } },
                            { "name": "total", "type": "float", "required": true,
                              "mock": { "min": 1, "max": 500 } },
                            { "name": "paid", "type": "boolean", "required": true }
                        ]
                    }),
                )]),
            },
        );

        let settings = Arc::new(RwLock::new(settings));
        let registry: Arc<dyn EndpointRegistry> =
            Arc::new(InMemoryEndpointRegistry::new(settings.clone()));
        let mock_service = Arc::new(MockService::new(
            registry.clone(),
            settings.read().await.mock.generate_options(),
            None,
        ));
        let health_handler = Arc::new(HealthHandler::new(registry));
        let metrics = Arc::new(MetricsCollector::new().unwrap());

        let app = proteus::create_app(mock_service, health_handler, metrics);

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
