//! Short URL lifecycle service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_well_formed};

/// Insert attempts before a run of short code collisions is reported as a
/// creation failure.
const MAX_CREATE_ATTEMPTS: usize = 5;

/// Service owning the short URL lifecycle.
///
/// Creation, resolution with click accounting, owner-scoped listing, update
/// and soft deletion. Ownership and uniqueness are enforced through
/// single-statement store operations, so the service keeps no state between
/// calls and is safe to share across concurrent requests.
///
/// Store failures are translated to stable messages; the service never logs.
pub struct UrlService<R, G>
where
    R: UrlRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    repository: Arc<R>,
    generator: Arc<G>,
    base_url: String,
}

impl<R, G> UrlService<R, G>
where
    R: UrlRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    /// Creates a new URL service.
    ///
    /// # Arguments
    ///
    /// - `repository` - short URL store
    /// - `generator` - source of fresh short codes
    /// - `base_url` - public base address; a trailing `/` is ignored
    pub fn new(repository: Arc<R>, generator: Arc<G>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator,
            base_url,
        }
    }

    /// Composes the display URL for a short code: `<base>/<code>`.
    pub fn short_url_for(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    /// Shortens `original_url`, optionally on behalf of `owner_id`.
    ///
    /// `original_url` must already be validated by the caller.
    ///
    /// # Collisions
    ///
    /// The generator does not consult the store. When the store rejects a
    /// code as already allocated, a new code is drawn and the insert is
    /// retried, up to `MAX_CREATE_ATTEMPTS` times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] ("Failed to create short URL") on any
    /// generator or store failure, including exhausted collision retries.
    pub async fn create_short_url(
        &self,
        original_url: &str,
        owner_id: Option<i64>,
    ) -> Result<ShortUrl, AppError> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let short_code = self.generator.generate().map_err(|_| creation_failed())?;

            let new_url = NewShortUrl {
                original_url: original_url.to_string(),
                short_url: self.short_url_for(&short_code),
                short_code,
                owner_id,
            };

            match self.repository.create(new_url).await {
                Ok(created) => return Ok(created),
                Err(e) if e.is_conflict() => continue,
                Err(_) => return Err(creation_failed()),
            }
        }

        Err(creation_failed())
    }

    /// Resolves a short code and records one click.
    ///
    /// The increment is a single atomic store operation, so concurrent
    /// resolutions of the same code never lose counts. The returned entity
    /// reflects the row before this click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, malformed or
    /// soft-deleted; nothing is mutated in that case.
    ///
    /// Returns [`AppError::Internal`] ("Failed to look up short URL") on
    /// store errors.
    pub async fn resolve(&self, short_code: &str) -> Result<ShortUrl, AppError> {
        if !is_well_formed(short_code) {
            return Err(short_code_not_found(short_code));
        }

        self.repository
            .resolve_and_count(short_code)
            .await
            .map_err(|_| AppError::internal("Failed to look up short URL", json!({})))?
            .ok_or_else(|| short_code_not_found(short_code))
    }

    /// Lists the live short URLs owned by `owner_id`, newest first.
    ///
    /// An owner with no short URLs gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] ("Failed to list short URLs") on store
    /// errors.
    pub async fn list_owned(&self, owner_id: i64) -> Result<Vec<ShortUrl>, AppError> {
        self.repository
            .list_by_owner(owner_id)
            .await
            .map_err(|_| AppError::internal("Failed to list short URLs", json!({})))
    }

    /// Points an owned short URL at a new original URL.
    ///
    /// The short code, short URL and click count are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `id` does not exist, is
    /// soft-deleted, or belongs to a different owner. The three cases are
    /// deliberately indistinguishable.
    ///
    /// Returns [`AppError::Internal`] ("Failed to update short URL") on
    /// store errors.
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        original_url: &str,
    ) -> Result<ShortUrl, AppError> {
        self.repository
            .update_original_url(id, owner_id, original_url)
            .await
            .map_err(|_| AppError::internal("Failed to update short URL", json!({})))?
            .ok_or_else(|| id_not_found(id))
    }

    /// Soft-deletes an owned short URL.
    ///
    /// The row and its code stay in the store; the short URL disappears from
    /// resolution and listing. Deleting again reports not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] under the same rules as [`Self::update`].
    ///
    /// Returns [`AppError::Internal`] ("Failed to delete short URL") on
    /// store errors.
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<ShortUrl, AppError> {
        self.repository
            .soft_delete(id, owner_id)
            .await
            .map_err(|_| AppError::internal("Failed to delete short URL", json!({})))?
            .ok_or_else(|| id_not_found(id))
    }

    /// Checks that the underlying store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store ping fails.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn creation_failed() -> AppError {
    AppError::internal("Failed to create short URL", json!({}))
}

fn short_code_not_found(short_code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "short_code": short_code }))
}

fn id_not_found(id: i64) -> AppError {
    AppError::not_found("Short URL not found", json!({ "id": id }))
}
