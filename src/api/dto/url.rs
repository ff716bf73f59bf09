//! DTOs for short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;
use crate::utils::url_validation::validate_original_url;

/// Request body for `POST /urls`.
///
/// A missing `originalUrl` deserializes to an empty string so that it fails
/// validation with a field error instead of a JSON rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_original_url"))]
    pub original_url: String,
}

/// Response body for `POST /urls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

impl From<ShortUrl> for CreateUrlResponse {
    fn from(url: ShortUrl) -> Self {
        Self {
            original_url: url.original_url,
            short_url: url.short_url,
            short_code: url.short_code,
        }
    }
}

/// Request body for `PUT /urls/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrlRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_original_url"))]
    pub original_url: String,
}

/// An owned short URL as returned by `GET /urls` and `PUT /urls/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortUrl> for UrlResponse {
    fn from(url: ShortUrl) -> Self {
        Self {
            id: url.id,
            original_url: url.original_url,
            short_code: url.short_code,
            short_url: url.short_url,
            click_count: url.click_count,
            created_at: url.created_at,
            updated_at: url.updated_at,
        }
    }
}
