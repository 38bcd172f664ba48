mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use emoji_shortener::application::services::ThrottlePolicy;
use emoji_shortener::infrastructure::persistence::MemoryUrlRepository;
use emoji_shortener::routes::app_router;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

fn strict_policy() -> ThrottlePolicy {
    ThrottlePolicy {
        window: Duration::from_secs(30),
        max_requests: 1,
        delay_after: 1,
        delay_step: Duration::from_millis(20),
        max_delay: Duration::from_millis(100),
    }
}

#[tokio::test]
async fn test_second_request_in_window_is_throttled() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = common::create_test_state_with(repository.clone(), strict_policy(), false);
    let server = common::create_test_server(state);

    let mut statuses = Vec::new();
    for i in 0..3 {
        let response = server
            .post("/newURL")
            .json(&json!({ "url": format!("https://{i}.example.com") }))
            .await;
        statuses.push(response.status_code());

        if response.status_code() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after: u64 = response.header("retry-after").to_str().unwrap().parse().unwrap();
            assert!((1..=30).contains(&retry_after));
            assert_eq!(response.json::<Value>()["code"], "too_many_requests");
        }
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert!(statuses[1..].contains(&StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn test_repeated_requests_are_slowed_down() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = common::create_test_state_with(repository, strict_policy(), false);
    let server = common::create_test_server(state);

    server
        .post("/newURL")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status_ok();

    let started = Instant::now();
    server
        .post("/newURL")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[tokio::test]
async fn test_forwarded_clients_are_independent() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = common::create_test_state_with(repository.clone(), strict_policy(), true);
    let server = common::create_test_server(state);

    for client in ["203.0.113.1", "203.0.113.2"] {
        server
            .post("/newURL")
            .add_header("x-forwarded-for", client)
            .json(&json!({ "url": "https://example.com" }))
            .await
            .assert_status_ok();
    }

    server
        .post("/newURL")
        .add_header("x-forwarded-for", "203.0.113.1, 10.0.0.1")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(repository.len(), 2);
}

#[tokio::test]
async fn test_peer_address_identifies_client() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = common::create_test_state_with(repository, strict_policy(), false);
    let app = app_router(state);

    let request = |peer: &str| {
        let mut request = Request::post("/newURL")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"url":"https://example.com"}"#))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    };

    let first = app.clone().oneshot(request("198.51.100.1:4000")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let other_peer = app.clone().oneshot(request("198.51.100.2:4000")).await.unwrap();
    assert_eq!(other_peer.status(), StatusCode::OK);

    let repeat = app.oneshot(request("198.51.100.1:5000")).await.unwrap();
    assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(repeat.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn test_other_routes_are_not_throttled() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = common::create_test_state_with(repository, strict_policy(), false);
    let server = common::create_test_server(state);

    for _ in 0..3 {
        server.get("/").await.assert_status_ok();
    }
}
