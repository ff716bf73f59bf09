//! Short URL entity.

use chrono::{DateTime, Utc};

/// A short code mapped to an original URL.
///
/// `short_code` is immutable once allocated; `original_url` may be changed
/// in place by the owner. `deleted_at` marks a soft-deleted row that stays in
/// the store (keeping its code reserved) but is invisible to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub owner_id: Option<i64>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Returns true if the short URL has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if `owner_id` owns this short URL.
    ///
    /// Anonymous short URLs are owned by nobody.
    pub fn is_owned_by(&self, owner_id: i64) -> bool {
        self.owner_id == Some(owner_id)
    }
}

/// Input data for persisting a new short URL.
///
/// The click counter always starts at zero and is not part of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortUrl {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub owner_id: Option<i64>,
}
