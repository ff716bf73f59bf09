//! In-process short URL repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    next_id: i64,
    rows: HashMap<i64, ShortUrl>,
    // Every code ever allocated, deleted rows included.
    by_code: HashMap<String, i64>,
}

/// Short URL repository backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    store: Mutex<Store>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut store = self.store.lock().await;

        if store.by_code.contains_key(&new_url.short_code) {
            return Err(AppError::conflict(
                "Short code already allocated",
                json!({ "short_code": new_url.short_code }),
            ));
        }

        store.next_id += 1;
        let id = store.next_id;
        let now = Utc::now();

        let row = ShortUrl {
            id,
            original_url: new_url.original_url,
            short_code: new_url.short_code,
            short_url: new_url.short_url,
            owner_id: new_url.owner_id,
            click_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        store.by_code.insert(row.short_code.clone(), id);
        store.rows.insert(id, row.clone());

        Ok(row)
    }

    async fn resolve_and_count(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        let mut store = self.store.lock().await;

        let Some(id) = store.by_code.get(short_code).copied() else {
            return Ok(None);
        };

        let Some(row) = store.rows.get_mut(&id).filter(|r| !r.is_deleted()) else {
            return Ok(None);
        };

        let before = row.clone();
        row.click_count += 1;

        Ok(Some(before))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, AppError> {
        let store = self.store.lock().await;

        let mut rows: Vec<ShortUrl> = store
            .rows
            .values()
            .filter(|r| r.is_owned_by(owner_id) && !r.is_deleted())
            .cloned()
            .collect();

        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(rows)
    }

    async fn update_original_url(
        &self,
        id: i64,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrl>, AppError> {
        let mut store = self.store.lock().await;

        let Some(row) = store
            .rows
            .get_mut(&id)
            .filter(|r| r.is_owned_by(owner_id) && !r.is_deleted())
        else {
            return Ok(None);
        };

        row.original_url = original_url.to_string();
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: i64, owner_id: i64) -> Result<Option<ShortUrl>, AppError> {
        let mut store = self.store.lock().await;

        let Some(row) = store
            .rows
            .get_mut(&id)
            .filter(|r| r.is_owned_by(owner_id) && !r.is_deleted())
        else {
            return Ok(None);
        };

        let now = Utc::now();
        row.deleted_at = Some(now);
        row.updated_at = now;

        Ok(Some(row.clone()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_url(code: &str, owner_id: Option<i64>) -> NewShortUrl {
        NewShortUrl {
            original_url: format!("https://example.com/{code}"),
            short_code: code.to_string(),
            short_url: format!("http://localhost:3000/{code}"),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_create_starts_at_zero_clicks() {
        let repo = InMemoryUrlRepository::new();

        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();

        assert_eq!(url.click_count, 0);
        assert_eq!(url.created_at, url.updated_at);
        assert!(url.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts_even_after_delete() {
        let repo = InMemoryUrlRepository::new();
        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();
        repo.soft_delete(url.id, 1).await.unwrap();

        let err = repo.create(new_url("abc123", Some(2))).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_resolve_returns_count_before_increment() {
        let repo = InMemoryUrlRepository::new();
        repo.create(new_url("abc123", None)).await.unwrap();

        let first = repo.resolve_and_count("abc123").await.unwrap().unwrap();
        let second = repo.resolve_and_count("abc123").await.unwrap().unwrap();

        assert_eq!(first.click_count, 0);
        assert_eq!(second.click_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_ignores_deleted_and_unknown() {
        let repo = InMemoryUrlRepository::new();
        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();
        repo.soft_delete(url.id, 1).await.unwrap();

        assert!(repo.resolve_and_count("abc123").await.unwrap().is_none());
        assert!(repo.resolve_and_count("zzz999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_resolves_are_all_counted() {
        let repo = Arc::new(InMemoryUrlRepository::new());
        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.resolve_and_count("abc123").await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = repo.list_by_owner(1).await.unwrap();
        assert_eq!(listed[0].id, url.id);
        assert_eq!(listed[0].click_count, 50);
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first_and_scoped() {
        let repo = InMemoryUrlRepository::new();
        let a = repo.create(new_url("aaaaaa", Some(1))).await.unwrap();
        let b = repo.create(new_url("bbbbbb", Some(1))).await.unwrap();
        repo.create(new_url("cccccc", Some(2))).await.unwrap();
        repo.create(new_url("dddddd", None)).await.unwrap();

        let listed = repo.list_by_owner(1).await.unwrap();

        let ids: Vec<i64> = listed.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let repo = InMemoryUrlRepository::new();
        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();

        let foreign = repo
            .update_original_url(url.id, 2, "https://evil.example")
            .await
            .unwrap();
        assert!(foreign.is_none());

        let updated = repo
            .update_original_url(url.id, 1, "https://new.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.original_url, "https://new.example");
        assert_eq!(updated.short_code, "abc123");
        assert!(updated.updated_at >= url.updated_at);
    }

    #[tokio::test]
    async fn test_soft_delete_once() {
        let repo = InMemoryUrlRepository::new();
        let url = repo.create(new_url("abc123", Some(1))).await.unwrap();

        assert!(repo.soft_delete(url.id, 2).await.unwrap().is_none());
        assert!(repo.soft_delete(url.id, 1).await.unwrap().is_some());
        assert!(repo.soft_delete(url.id, 1).await.unwrap().is_none());
        assert!(
            repo.update_original_url(url.id, 1, "https://x.example")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_anonymous_rows_cannot_be_mutated() {
        let repo = InMemoryUrlRepository::new();
        let url = repo.create(new_url("abc123", None)).await.unwrap();

        assert!(repo.soft_delete(url.id, 0).await.unwrap().is_none());
        assert!(
            repo.update_original_url(url.id, 0, "https://x.example")
                .await
                .unwrap()
                .is_none()
        );
    }
}
