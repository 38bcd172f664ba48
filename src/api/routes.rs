//! API route configuration.

use crate::api::handlers::{last_url_handler, new_url_handler};
use crate::api::middleware::throttle;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// JSON API routes.
///
/// # Endpoints
///
/// - `GET  /lasturl` - Most recently created short URL
/// - `POST /newURL`  - Create a short URL (throttled per client)
pub fn routes(state: &AppState) -> Router<AppState> {
    let create = Router::new()
        .route("/newURL", post(new_url_handler))
        .route_layer(middleware::from_fn_with_state(
            state.throttler.clone(),
            throttle::layer,
        ));

    Router::new()
        .route("/lasturl", get(last_url_handler))
        .merge(create)
}
