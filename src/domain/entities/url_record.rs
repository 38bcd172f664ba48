//! URL record entity representing a slug → target mapping.

use chrono::{DateTime, Utc};

use crate::utils::slug_codec;

/// A persisted short URL.
///
/// `key` is the encoded form of the slug and is unique across all records.
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub key: String,
    pub raw_slug: Option<String>,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        key: String,
        raw_slug: Option<String>,
        target_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            raw_slug,
            target_url,
            created_at,
        }
    }

    /// Returns the human-readable slug.
    ///
    /// Falls back to decoding `key` when no raw slug was stored, and to the
    /// key itself if it cannot be decoded.
    pub fn display_slug(&self) -> String {
        match &self.raw_slug {
            Some(raw) => raw.clone(),
            None => slug_codec::decode(&self.key).unwrap_or_else(|_| self.key.clone()),
        }
    }

    /// Position of this record in newest-first ordering.
    pub fn cursor(&self) -> RecordCursor {
        RecordCursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub key: String,
    pub raw_slug: Option<String>,
    pub target_url: String,
}

/// Keyset position used to page through records newest-first.
///
/// A page requested with `before = Some(cursor)` holds only records strictly
/// older than the cursor, ordered by `(created_at, id)` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCursor {
    pub created_at: DateTime<Utc>,
    pub id: i64,
}

impl RecordCursor {
    /// Returns true if `record` sorts strictly after this cursor (i.e. is older).
    pub fn precedes(&self, record: &UrlRecord) -> bool {
        (record.created_at, record.id) < (self.created_at, self.id)
    }
}
