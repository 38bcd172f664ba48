//! Handler for the most recent record.

use axum::{Json, extract::State};

use crate::api::dto::url_record::UrlRecordResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the most recently created short URL.
///
/// # Endpoint
///
/// `GET /lasturl`
///
/// # Errors
///
/// Returns 404 Not Found if no short URL has been created yet.
pub async fn last_url_handler(
    State(state): State<AppState>,
) -> Result<Json<UrlRecordResponse>, AppError> {
    let record = state.url_service.most_recent().await?;
    Ok(Json(record.into()))
}
