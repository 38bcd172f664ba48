#![allow(dead_code)]

use axum_test::TestServer;
use emoji_shortener::application::services::{ThrottlePolicy, Throttler, UrlService};
use emoji_shortener::domain::repositories::UrlRepository;
use emoji_shortener::infrastructure::persistence::MemoryUrlRepository;
use emoji_shortener::routes::app_router;
use emoji_shortener::state::{AppState, PublicSite};
use std::sync::Arc;

pub const TEST_DOMAIN: &str = "localhost:3000";
pub const TEST_PORT: u16 = 3000;

pub fn create_test_state_with(
    repository: Arc<dyn UrlRepository>,
    policy: ThrottlePolicy,
    behind_proxy: bool,
) -> AppState {
    let url_service = Arc::new(UrlService::new(repository));
    let throttler = Arc::new(Throttler::new(policy, behind_proxy));
    let site = PublicSite::new("http", TEST_DOMAIN, TEST_PORT);

    AppState::new(url_service, throttler, site)
}

/// State backed by a fresh in-memory store, with throttling effectively off.
pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = create_test_state_with(repository.clone(), ThrottlePolicy::permissive(), false);
    (state, repository)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}
