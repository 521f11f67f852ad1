//! Driving port for hashtag listings and backfill.
use async_trait::async_trait;

use crate::domain::{Error, Hashtag, HashtagCount};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HashtagCatalogue: Send + Sync {
    /// The twenty most used post hashtags.
    async fn top_hashtags(&self) -> Result<Vec<HashtagCount>, Error>;

    /// Stored hashtags that are not explicit words, least used first.
    async fn hashtags_by_usage(&self, limit: u32) -> Result<Vec<Hashtag>, Error>;

    /// Backfill stored hashtags from post hashtags. Returns how many
    /// hashtags were created or incremented.
    async fn migrate_hashtags(&self) -> Result<u64, Error>;
}
