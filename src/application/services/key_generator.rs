//! Slug key resolution: validate a user slug or synthesize a random one.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::emoji_alphabet::{key_space, random_slug};
use crate::utils::slug::validate_custom_slug;
use crate::utils::slug_codec;

/// Default number of synthesis attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Counter of synthesized slugs discarded because their key was taken.
pub const COLLISIONS_METRIC: &str = "emoji_shortener_slug_collisions_total";

/// Counter of synthesis runs that exhausted every attempt.
pub const EXHAUSTED_METRIC: &str = "emoji_shortener_slug_exhausted_total";

/// A slug paired with its storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: String,
    pub raw_slug: String,
}

/// Produces keys that were unused at the time of the check.
///
/// The existence check is advisory: a concurrent creator can claim the same
/// key between the check and the insert. The store's unique constraint
/// decides the race (see [`crate::application::services::UrlService::create`]).
///
/// # Retry Budget
///
/// With an alphabet of `N` symbols and slugs of length `L`, a store holding a
/// fraction `f` of the `N^L` keys needs `1 / (1 - f)` attempts on average.
/// Attempts are capped at `max_attempts`; every collision increments
/// [`COLLISIONS_METRIC`], which is the signal to watch for alphabet
/// exhaustion.
pub struct KeyGenerator {
    repository: Arc<dyn UrlRepository>,
    max_attempts: usize,
}

impl KeyGenerator {
    /// Creates a generator with [`DEFAULT_MAX_ATTEMPTS`].
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self::with_max_attempts(repository, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(repository: Arc<dyn UrlRepository>, max_attempts: usize) -> Self {
        Self {
            repository,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Resolves the key for a new record.
    ///
    /// - `Some(slug)`: validates and encodes it, failing if the key is taken.
    /// - `None`: synthesizes a random emoji slug whose key is unused.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user slug is invalid or already
    /// in use. Returns [`AppError::Internal`] if synthesis exhausts its
    /// attempts. Store failures are propagated.
    pub async fn resolve_key(&self, user_raw: Option<&str>) -> Result<ResolvedKey, AppError> {
        match user_raw {
            Some(raw) => self.resolve_custom(raw).await,
            None => self.synthesize().await,
        }
    }

    /// Returns whether a record with `key` exists.
    pub async fn key_exists(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.repository.find_by_key(key).await?.is_some())
    }

    async fn resolve_custom(&self, raw: &str) -> Result<ResolvedKey, AppError> {
        let raw_slug = validate_custom_slug(raw)?;
        let key = slug_codec::encode(&raw_slug)?;

        if self.key_exists(&key).await? {
            return Err(slug_in_use(&raw_slug));
        }

        Ok(ResolvedKey { key, raw_slug })
    }

    async fn synthesize(&self) -> Result<ResolvedKey, AppError> {
        for attempt in 1..=self.max_attempts {
            let raw_slug = random_slug(&mut rand::rng());
            let key = slug_codec::encode(&raw_slug)?;

            if !self.key_exists(&key).await? {
                if attempt > 1 {
                    tracing::debug!(attempt, "Synthesized slug after collisions");
                }
                return Ok(ResolvedKey { key, raw_slug });
            }

            metrics::counter!(COLLISIONS_METRIC).increment(1);
            tracing::debug!(attempt, key = %key, "Synthesized slug collided");
        }

        metrics::counter!(EXHAUSTED_METRIC).increment(1);
        tracing::warn!(
            attempts = self.max_attempts,
            key_space = %key_space(),
            "Slug synthesis exhausted its attempts"
        );

        Err(AppError::internal(
            "Failed to generate a unique slug",
            json!({ "reason": "Too many collisions", "attempts": self.max_attempts }),
        ))
    }
}

/// Error returned when a user slug is taken.
pub(crate) fn slug_in_use(raw_slug: &str) -> AppError {
    AppError::bad_request("Slug already in use", json!({ "slug": raw_slug }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlRecord;
    use crate::domain::repositories::MockUrlRepository;
    use crate::utils::emoji_alphabet::{EMOJI_ALPHABET, SLUG_LENGTH};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn existing(key: &str) -> UrlRecord {
        UrlRecord::new(
            1,
            key.to_string(),
            None,
            "https://example.com".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_custom_slug_free() {
        let mut mock_repo = MockUrlRepository::new();
        let expected_key = slug_codec::encode("🎉🎈").unwrap();
        let checked = expected_key.clone();

        mock_repo
            .expect_find_by_key()
            .withf(move |key| key == checked)
            .times(1)
            .returning(|_| Ok(None));

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let resolved = generator.resolve_key(Some(" 🎉🎈 ")).await.unwrap();

        assert_eq!(resolved.raw_slug, "🎉🎈");
        assert_eq!(resolved.key, expected_key);
    }

    #[tokio::test]
    async fn test_custom_slug_taken() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_key()
            .times(1)
            .returning(|key| Ok(Some(existing(key))));

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let err = generator.resolve_key(Some("🎉🎈")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("already in use"));
    }

    #[tokio::test]
    async fn test_artifact_only_slug_rejected_without_lookup() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_find_by_key().times(0);

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let err = generator.resolve_key(Some(" \u{200D} - ")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_synthesized_slug_shape() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_key()
            .times(1)
            .returning(|_| Ok(None));

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let resolved = generator.resolve_key(None).await.unwrap();

        assert_eq!(resolved.raw_slug.chars().count(), SLUG_LENGTH);
        assert!(resolved.raw_slug.chars().all(|c| EMOJI_ALPHABET.contains(&c)));
        assert_eq!(slug_codec::decode(&resolved.key).unwrap(), resolved.raw_slug);
    }

    #[tokio::test]
    async fn test_synthesis_retries_on_collision() {
        let mut mock_repo = MockUrlRepository::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        mock_repo.expect_find_by_key().times(4).returning(move |key| {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                Ok(Some(existing(key)))
            } else {
                Ok(None)
            }
        });

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let resolved = generator.resolve_key(None).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(resolved.raw_slug.chars().count(), SLUG_LENGTH);
    }

    #[tokio::test]
    async fn test_synthesis_gives_up_after_max_attempts() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_key()
            .times(5)
            .returning(|key| Ok(Some(existing(key))));

        let generator = KeyGenerator::with_max_attempts(Arc::new(mock_repo), 5);
        let err = generator.resolve_key(None).await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_find_by_key().times(1).returning(|_| {
            Err(AppError::store_unavailable(
                "Store operation timed out",
                json!({}),
            ))
        });

        let generator = KeyGenerator::new(Arc::new(mock_repo));
        let err = generator.resolve_key(None).await.unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }
}
