//! Browser-facing route configuration.

use crate::state::AppState;
use crate::web::handlers::{landing_handler, resolve_handler};
use axum::{Router, routing::get};

/// HTML routes.
///
/// # Endpoints
///
/// - `GET /`     - Landing page with the creation form
/// - `GET /{id}` - Short link resolution page
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing_handler))
        .route("/{id}", get(resolve_handler))
}
