//! Short link resolution page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Page sending the visitor on to the target URL.
#[derive(Template, WebTemplate)]
#[template(path = "link.html")]
struct LinkTemplate {
    slug: String,
    target_url: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    slug: String,
}

/// Resolves a raw slug to its target.
///
/// # Endpoint
///
/// `GET /{id}` where `id` is the percent-decoded raw slug.
///
/// # Responses
///
/// - `200` page naming the slug, with a link and a meta refresh to the target
/// - `404` HTML page when the slug is unknown
///
/// # Errors
///
/// Store failures surface as JSON 500 responses.
pub async fn resolve_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.url_service.resolve(&id).await {
        Ok(record) => {
            tracing::debug!(key = %record.key, "Resolved short URL");
            Ok(LinkTemplate {
                slug: record.display_slug(),
                target_url: record.target_url,
            }
            .into_response())
        }
        Err(AppError::NotFound { .. }) => {
            Ok((StatusCode::NOT_FOUND, NotFoundTemplate { slug: id }).into_response())
        }
        Err(e) => Err(e),
    }
}
