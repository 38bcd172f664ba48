//! Handler for the link creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::new_url::{NewUrlRequest, NewUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL, optionally with a custom emoji slug.
///
/// # Endpoint
///
/// `POST /newURL` (throttled per client)
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "emojis": "🎉🎈" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "port": 3000,
///   "domain": "localhost:3000",
///   "id": 1,
///   "key": "ck8hb",
///   "rawSlug": "🎉🎈",
///   "targetUrl": "https://example.com",
///   "createdAt": "2025-01-01T00:00:00Z",
///   "shortUrl": "http://localhost:3000/%F0%9F%8E%89%F0%9F%8E%88"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON, an invalid URL, an unusable
/// slug, or a slug already in use. Returns 429 when throttled.
pub async fn new_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewUrlRequest>, JsonRejection>,
) -> Result<Json<NewUrlResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let record = state
        .url_service
        .create(&payload.url, payload.emojis.as_deref())
        .await?;

    let short_url = state.site.short_url(&record.display_slug());

    Ok(Json(NewUrlResponse {
        port: state.site.port,
        domain: state.site.domain.clone(),
        record: record.into(),
        short_url,
    }))
}
