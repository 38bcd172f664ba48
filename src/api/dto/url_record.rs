//! JSON representation of a stored URL record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlRecord;

/// A stored short URL as returned by `GET /lasturl` and `POST /newURL`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecordResponse {
    pub id: i64,
    pub key: String,
    pub raw_slug: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for UrlRecordResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            raw_slug: record.display_slug(),
            id: record.id,
            key: record.key,
            target_url: record.target_url,
            created_at: record.created_at,
        }
    }
}
