mod common;
mod health_test;
mod mock_serving_test;
