//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`         - Landing page
//! - `GET  /lasturl`  - Most recent record (JSON)
//! - `POST /newURL`   - Create a short URL (throttled)
//! - `GET  /{id}`     - Short link resolution page
//! - `/static/*`      - Static assets
//! - anything else    - `404 Not Found - <path>` (JSON)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - Panics become 500 JSON responses
//! - **CORS** - Permissive cross-origin access
//! - **Security headers** - `nosniff`, `SAMEORIGIN` framing, no referrer

use crate::api;
use crate::api::handlers::not_found_handler;
use crate::api::middleware::{panic, tracing};
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::routes(&state))
        .merge(web::routes::routes())
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(security_header(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(security_header(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(security_header(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(panic::layer())
        .layer(tracing::layer())
}

fn security_header(name: HeaderName, value: HeaderValue) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, value)
}
