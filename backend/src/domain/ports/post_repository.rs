//! Port abstraction for the post store.
//!
//! Reads take a [`PostsQuery`], never a raw [`PostsFilter`](crate::domain::feed::PostsFilter),
//! so adapters only ever see queries with non-empty clauses.

use async_trait::async_trait;

use crate::domain::feed::{PostsQuery, PostsSelection};
use crate::domain::{HashtagCount, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post store adapters.
    pub enum PostRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "post store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts matching `query`, ordered and windowed by `selection`.
    async fn find(
        &self,
        query: &PostsQuery,
        selection: PostsSelection,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    /// Number of posts matching `query`.
    async fn count(&self, query: &PostsQuery) -> Result<u64, PostRepositoryError>;

    /// Number of stored posts.
    async fn count_all(&self) -> Result<u64, PostRepositoryError>;

    /// Whether a post with this natural key is stored.
    async fn exists_by_hash(&self, post_hash: &str) -> Result<bool, PostRepositoryError>;

    /// Insert unless the post hash is already present.
    ///
    /// Returns `false` when an existing row won the unique constraint.
    async fn insert_if_absent(&self, post: &Post) -> Result<bool, PostRepositoryError>;

    /// Delete up to `count` posts, oldest creation time first. Returns the
    /// number deleted.
    async fn delete_oldest(&self, count: u64) -> Result<u64, PostRepositoryError>;

    /// Posts with the given ids, in no particular order.
    async fn find_by_ids(&self, ids: &[PostId]) -> Result<Vec<Post>, PostRepositoryError>;

    /// Hashtag occurrence counts across all posts, most frequent first.
    /// `None` returns every hashtag.
    async fn hashtag_counts(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<HashtagCount>, PostRepositoryError>;
}
