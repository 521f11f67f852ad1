//! Port interface for caching assembled feed pages.
use async_trait::async_trait;

use crate::domain::feed::FeedPage;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the feed cache adapter.
    pub enum FeedCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "feed cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "feed cache serialisation failed: {message}",
    }
}

/// Short-lived page cache keyed by the feed cache key string.
///
/// Writes overwrite unconditionally; concurrent misses for one key are
/// last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Read a cached page.
    async fn get(&self, key: &str) -> Result<Option<FeedPage>, FeedCacheError>;

    /// Store a page under `key` for the adapter's configured TTL.
    async fn set(&self, key: &str, page: &FeedPage) -> Result<(), FeedCacheError>;
}
