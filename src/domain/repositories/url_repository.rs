//! Repository trait for URL record data access.

use crate::domain::entities::{NewUrlRecord, RecordCursor, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for URL records.
///
/// Uniqueness of `key` is enforced by the implementation itself (a unique
/// index or an atomic insert-if-absent), never only by callers checking
/// [`UrlRepository::find_by_key`] first.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a record with the same key exists.
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be reached
    /// in time.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by its encoded key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] or [`AppError::Internal`] on
    /// store failures.
    async fn find_by_key(&self, key: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Lists up to `limit` records older than `before`, newest first.
    ///
    /// `before = None` starts from the most recent record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] or [`AppError::Internal`] on
    /// store failures.
    async fn list_page(
        &self,
        before: Option<RecordCursor>,
        limit: i64,
    ) -> Result<Vec<UrlRecord>, AppError>;
}
