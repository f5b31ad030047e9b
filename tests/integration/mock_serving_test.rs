use super::common;

use common::test_server::TestServer;

#[tokio::test]
async fn test_generated_order_shape() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    for _ in 0..10 {
        let response = client
            .get(server.url("/mock/demo/orders/A-17"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["x-mock-endpoint"], "get-order");

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["order_id"].as_str().unwrap().len(), 36);
        let total = body["total"].as_f64().unwrap();
        assert!((1.0..=500.0).contains(&total));
        assert!(body["paid"].is_boolean());
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, server.url("/mock/demo/orders/1"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/mock/demo/customers/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
