//! Health and documentation endpoints.
//!
//! Run with: `cargo test -p saasbase-api --test health_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_root_and_health() {
    let app = setup_test_app().await;
    let client = app.client();

    let root = client.get("/").await;
    assert_eq!(root.status_code(), 200);
    assert_eq!(root.text(), "OK");

    let health = client.get("/health").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(health.text(), "HEALTHY");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"]["/user/avatar"].is_object());
}

#[tokio::test]
async fn test_routes_follow_api_root_path() {
    let app = helpers::setup_test_app_with_root("/v1/").await;
    let client = app.client();

    assert_eq!(client.get("/v1/health").await.status_code(), 200);
    assert_eq!(client.get("/health").await.status_code(), 404);
}
