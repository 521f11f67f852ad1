//! Driving port for feed reads.
//!
//! HTTP handlers parse query parameters into a [`FeedRequest`] and call this
//! port; caching, moderation and the two-pass fill happen behind it.

use async_trait::async_trait;

use crate::domain::feed::{FeedPage, FeedSort};
use crate::domain::{Error, Post};

/// Parsed feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Requesting user; biases the first pass towards their preferences.
    pub user_id: Option<String>,
    /// Single hashtag without `#`; blank means none.
    pub hashtag: Option<String>,
    /// Free text whose tokens drive a full-text search.
    pub related_of: Option<String>,
    /// Raw `moment` parameter; only `"true"` selects moments.
    pub moment: Option<String>,
    pub sort: FeedSort,
}

impl FeedRequest {
    /// The requested hashtag when present and non-blank.
    #[must_use]
    pub fn singular_tag(&self) -> Option<&str> {
        self.hashtag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Assemble one feed page.
    ///
    /// # Errors
    ///
    /// Returns an internal error with message `Failed to get posts` when the
    /// post store fails. Cache failures never surface.
    async fn feed(&self, request: FeedRequest) -> Result<FeedPage, Error>;

    /// Up to five non-moment posts related to `title`.
    async fn suggestions(&self, title: &str) -> Result<Vec<Post>, Error>;
}
