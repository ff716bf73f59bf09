//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::{SHORT_CODE_CONSTRAINT, is_unique_violation_on};

const COLUMNS: &str = "id, original_url, short_code, short_url, owner_id, click_count, \
                       created_at, updated_at, deleted_at";

#[derive(FromRow)]
struct ShortUrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    short_url: String,
    owner_id: Option<i64>,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            short_url: row.short_url,
            owner_id: row.owner_id,
            click_count: row.click_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// PostgreSQL repository for short URLs.
///
/// Each operation is a single statement. Resolution, update and soft delete
/// are conditional `UPDATE ... RETURNING` statements, so lookup and mutation
/// cannot interleave with a concurrent request.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let sql = format!(
            "INSERT INTO short_urls (original_url, short_code, short_url, owner_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(&new_url.original_url)
            .bind(&new_url.short_code)
            .bind(&new_url.short_url)
            .bind(new_url.owner_id)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, SHORT_CODE_CONSTRAINT) {
                    AppError::conflict(
                        "Short code already allocated",
                        json!({ "short_code": new_url.short_code }),
                    )
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(row.into())
    }

    async fn resolve_and_count(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        // RETURNING sees the post-update row; report the count as it was before this click.
        let sql = "UPDATE short_urls \
                   SET click_count = click_count + 1 \
                   WHERE short_code = $1 AND deleted_at IS NULL \
                   RETURNING id, original_url, short_code, short_url, owner_id, \
                             click_count - 1 AS click_count, created_at, updated_at, deleted_at";

        let row = sqlx::query_as::<_, ShortUrlRow>(sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM short_urls \
             WHERE owner_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ShortUrl::from).collect())
    }

    async fn update_original_url(
        &self,
        id: i64,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrl>, AppError> {
        let sql = format!(
            "UPDATE short_urls \
             SET original_url = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn soft_delete(&self, id: i64, owner_id: i64) -> Result<Option<ShortUrl>, AppError> {
        let sql = format!(
            "UPDATE short_urls \
             SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
