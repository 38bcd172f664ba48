//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::state::AppState;

/// Template for the landing page.
///
/// Renders `templates/index.html` with the creation form, which posts to
/// `/newURL` from `static/app.js`.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    domain: String,
}

/// Renders the landing page.
///
/// # Endpoint
///
/// `GET /`
pub async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    IndexTemplate {
        domain: state.site.domain.clone(),
    }
}
