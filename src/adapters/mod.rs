pub mod endpoint_registry;
pub mod health_handler;
pub mod metrics_handler;
pub mod mock_generator;
pub mod mock_handler;
pub mod mock_service;
pub mod path_matcher;
