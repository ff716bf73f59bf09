//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URLs.
///
/// Every read and mutation except [`UrlRepository::create`] ignores
/// soft-deleted rows. Mutations are single atomic store operations: there is
/// no read-then-write window an implementation may open between the lookup
/// and the change.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new short URL with a click count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already allocated
    /// to any row, live or deleted.
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Atomically increments the click counter of the live row with this
    /// exact code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortUrl))` with the row as it was *before* the increment
    /// - `Ok(None)` if no live row has this code (nothing is mutated)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn resolve_and_count(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Lists live rows owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, AppError>;

    /// Replaces `original_url` of the live row matching both `id` and
    /// `owner_id`.
    ///
    /// Returns `Ok(None)` when no such row exists; a row that exists but
    /// belongs to someone else is left untouched and reported the same way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn update_original_url(
        &self,
        id: i64,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Soft-deletes the live row matching both `id` and `owner_id` by
    /// setting `deleted_at = now()`.
    ///
    /// Returns the deleted row, or `Ok(None)` if there was no live match.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn soft_delete(&self, id: i64, owner_id: i64) -> Result<Option<ShortUrl>, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
