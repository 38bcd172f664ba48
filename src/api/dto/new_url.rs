//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::url_record::UrlRecordResponse;

/// Request to create a short URL.
///
/// # Example
///
/// ```json
/// { "url": "https://example.com", "emojis": "🎉🎈" }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct NewUrlRequest {
    /// Target URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Optional custom slug. Absent or empty requests a random emoji slug.
    #[serde(default)]
    pub emojis: Option<String>,
}

/// Created short URL together with the public origin serving it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUrlResponse {
    pub port: u16,
    pub domain: String,
    #[serde(flatten)]
    pub record: UrlRecordResponse,
    pub short_url: String,
}
