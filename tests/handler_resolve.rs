mod common;

use serde_json::json;

#[tokio::test]
async fn test_resolve_custom_slug() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    server
        .post("/newURL")
        .json(&json!({ "url": "https://example.com", "emojis": "🎉🎈" }))
        .await
        .assert_status_ok();

    let response = server.get("/%F0%9F%8E%89%F0%9F%8E%88").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("🎉🎈"));
    assert!(html.contains("https://example.com"));
}

#[tokio::test]
async fn test_resolve_random_slug() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let created = server
        .post("/newURL")
        .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
        .await
        .json::<serde_json::Value>();
    let raw_slug = created["rawSlug"].as_str().unwrap();

    let response = server.get(&format!("/{raw_slug}")).await;

    response.assert_status_ok();
    assert!(response.text().contains("www.rust-lang.org/learn"));
}

#[tokio::test]
async fn test_resolve_unknown_slug() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/%F0%9F%A6%84").await;

    response.assert_status_not_found();
    assert!(response.text().contains("Not found"));
}

#[tokio::test]
async fn test_resolve_artifact_only_slug_is_not_found() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/-").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/no/such/route").await;

    response.assert_status_not_found();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["message"], "Not Found - /no/such/route");
}

#[tokio::test]
async fn test_landing_page() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("shorten-form"));
    assert!(html.contains(common::TEST_DOMAIN));
}

#[tokio::test]
async fn test_security_headers() {
    let (state, _repository) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
    assert_eq!(response.header("referrer-policy"), "no-referrer");
}
