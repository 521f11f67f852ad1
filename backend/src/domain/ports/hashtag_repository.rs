//! Port abstraction for stored hashtags.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Hashtag, HashtagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by hashtag store adapters.
    pub enum HashtagRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "hashtag store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "hashtag store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HashtagRepository: Send + Sync {
    /// Hashtags with the given ids, in no particular order.
    async fn find_by_ids(&self, ids: &[HashtagId]) -> Result<Vec<Hashtag>, HashtagRepositoryError>;

    /// Hashtags whose name is not in `excluded`, least used first.
    async fn list_by_usage(
        &self,
        excluded: &[String],
        limit: u32,
    ) -> Result<Vec<Hashtag>, HashtagRepositoryError>;

    /// Create `name` with `count` posts, or add `count` to an existing one.
    async fn increment(
        &self,
        name: &str,
        count: i64,
        now: DateTime<Utc>,
    ) -> Result<Hashtag, HashtagRepositoryError>;
}
