//! URL record creation, resolution and listing service.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::json;

use crate::application::services::key_generator::{COLLISIONS_METRIC, KeyGenerator, slug_in_use};
use crate::domain::entities::{NewUrlRecord, RecordCursor, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::slug::is_real_symbol;
use crate::utils::slug_codec;
use crate::utils::url_validator::validate_target_url;

/// Number of records fetched per page by [`UrlService::list_all`].
pub const LIST_PAGE_SIZE: i64 = 100;

/// Insert attempts for synthesized slugs that lose a race on the unique key.
const MAX_INSERT_ATTEMPTS: usize = 8;

/// Counter of records created.
pub const CREATED_METRIC: &str = "emoji_shortener_urls_created_total";

/// Service for creating and resolving short URLs.
///
/// Combines target validation, key resolution and persistence. The store's
/// uniqueness constraint is the authority on key ownership: a `Conflict` on
/// insert means a concurrent request won the key.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    generator: KeyGenerator,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        let generator = KeyGenerator::new(repository.clone());
        Self::with_generator(repository, generator)
    }

    pub fn with_generator(repository: Arc<dyn UrlRepository>, generator: KeyGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Creates a short URL.
    ///
    /// An absent or empty `user_slug` requests a synthesized emoji slug.
    ///
    /// # Concurrency
    ///
    /// If the insert hits the unique constraint:
    /// - synthesized slug: a new slug is generated and the insert retried
    /// - user slug: fails with "Slug already in use"
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - the target URL is malformed or not HTTP(S)
    /// - the user slug is invalid or already in use
    ///
    /// Returns [`AppError::Internal`] if no free key could be found and
    /// [`AppError::StoreUnavailable`] on store failures.
    pub async fn create(
        &self,
        target_url: &str,
        user_slug: Option<&str>,
    ) -> Result<UrlRecord, AppError> {
        let target_url = validate_target_url(target_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "url": target_url }))
        })?;

        let user_slug = user_slug.filter(|s| !s.is_empty());

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let resolved = self.generator.resolve_key(user_slug).await?;

            let new_record = NewUrlRecord {
                key: resolved.key,
                raw_slug: Some(resolved.raw_slug.clone()),
                target_url: target_url.clone(),
            };

            match self.repository.create(new_record).await {
                Ok(record) => {
                    metrics::counter!(CREATED_METRIC).increment(1);
                    tracing::info!(
                        id = record.id,
                        key = %record.key,
                        custom = user_slug.is_some(),
                        "Short URL created"
                    );
                    return Ok(record);
                }
                Err(AppError::Conflict { .. }) if user_slug.is_some() => {
                    return Err(slug_in_use(&resolved.raw_slug));
                }
                Err(AppError::Conflict { .. }) => {
                    metrics::counter!(COLLISIONS_METRIC).increment(1);
                    tracing::debug!(attempt, "Lost insert race for synthesized slug, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique slug",
            json!({ "reason": "Insert kept conflicting", "attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    /// Resolves a raw slug (as typed in the short link) to its record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown or could never
    /// have been created.
    pub async fn resolve(&self, raw_slug: &str) -> Result<UrlRecord, AppError> {
        let slug = raw_slug.trim();
        let not_found = || AppError::not_found("Short URL not found", json!({ "slug": raw_slug }));

        if !slug.chars().any(is_real_symbol) {
            return Err(not_found());
        }

        let Ok(key) = slug_codec::encode(slug) else {
            return Err(not_found());
        };

        self.repository
            .find_by_key(&key)
            .await?
            .ok_or_else(not_found)
    }

    /// Streams every record, newest first.
    ///
    /// The stream is lazy (pages of [`LIST_PAGE_SIZE`] are fetched on
    /// demand), finite, and each call starts again from the most recent
    /// record. A store error ends the stream after being yielded.
    pub fn list_all(&self) -> BoxStream<'static, Result<UrlRecord, AppError>> {
        let repository = self.repository.clone();

        stream::try_unfold(
            (repository, None::<RecordCursor>, false),
            |(repository, cursor, done)| async move {
                if done {
                    return Ok::<_, AppError>(None);
                }

                let page = repository.list_page(cursor, LIST_PAGE_SIZE).await?;
                let Some(last) = page.last() else {
                    return Ok(None);
                };

                let next_cursor = Some(last.cursor());
                let exhausted = (page.len() as i64) < LIST_PAGE_SIZE;

                Ok(Some((
                    stream::iter(page.into_iter().map(Ok::<UrlRecord, AppError>)),
                    (repository, next_cursor, exhausted),
                )))
            },
        )
        .try_flatten()
        .boxed()
    }

    /// Returns the most recently created record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store is empty.
    pub async fn most_recent(&self) -> Result<UrlRecord, AppError> {
        self.list_all()
            .next()
            .await
            .unwrap_or_else(|| Err(AppError::not_found("No short URLs yet", json!({}))))
    }
}
