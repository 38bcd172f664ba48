//! In-process implementation of the URL repository.
//!
//! Selected with `DATABASE_URL=memory://`. Records live as long as the
//! process, which makes this backend suitable for development and tests only.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, RecordCursor, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Concurrent in-memory store keyed by encoded slug.
///
/// Inserts go through the map's entry API, so two concurrent `create` calls
/// for one key cannot both succeed.
#[derive(Default)]
pub struct MemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.records.entry(new_record.key.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_slug_key_key" }),
            )),
            Entry::Vacant(slot) => {
                let record = UrlRecord::new(
                    self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    new_record.key,
                    new_record.raw_slug,
                    new_record.target_url,
                    Utc::now(),
                );
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get(key).map(|r| r.value().clone()))
    }

    async fn list_page(
        &self,
        before: Option<RecordCursor>,
        limit: i64,
    ) -> Result<Vec<UrlRecord>, AppError> {
        let mut page: Vec<UrlRecord> = self
            .records
            .iter()
            .filter(|r| before.is_none_or(|cursor| cursor.precedes(r.value())))
            .map(|r| r.value().clone())
            .collect();

        page.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        page.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_record(key: &str, url: &str) -> NewUrlRecord {
        NewUrlRecord {
            key: key.to_string(),
            raw_slug: Some(key.trim_end_matches('-').to_string()),
            target_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryUrlRepository::new();

        let created = repo
            .create(new_record("abc-", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.key, "abc-");

        let found = repo.find_by_key("abc-").await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = MemoryUrlRepository::new();
        assert!(repo.find_by_key("nope-").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_key_conflicts() {
        let repo = MemoryUrlRepository::new();
        repo.create(new_record("abc-", "https://a.com"))
            .await
            .unwrap();

        let result = repo.create(new_record("abc-", "https://b.com")).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(repo.len(), 1);

        let kept = repo.find_by_key("abc-").await.unwrap().unwrap();
        assert_eq!(kept.target_url, "https://a.com");
    }

    #[tokio::test]
    async fn test_concurrent_creates_single_winner() {
        let repo = Arc::new(MemoryUrlRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_record("same-", &format!("https://{i}.example.com")))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::Conflict { .. }) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 31);
    }

    #[tokio::test]
    async fn test_list_page_newest_first() {
        let repo = MemoryUrlRepository::new();
        for key in ["a-", "b-", "c-", "d-", "e-"] {
            repo.create(new_record(key, "https://example.com"))
                .await
                .unwrap();
        }

        let first = repo.list_page(None, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].key, "e-");
        assert_eq!(first[1].key, "d-");

        let second = repo
            .list_page(Some(first[1].cursor()), 2)
            .await
            .unwrap();
        assert_eq!(
            second.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(),
            vec!["c-", "b-"]
        );

        let last = repo
            .list_page(Some(second[1].cursor()), 2)
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].key, "a-");

        let past_end = repo.list_page(Some(last[0].cursor()), 2).await.unwrap();
        assert!(past_end.is_empty());
    }
}
