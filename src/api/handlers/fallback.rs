//! Catch-all handler for unknown routes.

use axum::http::Uri;
use serde_json::json;

use crate::error::AppError;

/// Responds `404 Not Found - <path>` for any unmatched route.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found(
        format!("Not Found - {}", uri.path()),
        json!({ "path": uri.path() }),
    )
}
