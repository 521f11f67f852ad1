//! Port abstraction for video record persistence.
use async_trait::async_trait;

use crate::domain::{Video, VideoId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by video store adapters.
    pub enum VideoRepositoryError {
        /// Another record already uses this URL.
        Duplicate { url: String } => "video {url} already exists",
        /// Store connection could not be established.
        Connection { message: String } => "video store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "video store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert or replace a record by id, failing with `Duplicate` when a
    /// different record holds the same URL.
    async fn save(&self, video: &Video) -> Result<(), VideoRepositoryError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<Video>, VideoRepositoryError>;

    /// Every record, oldest first.
    async fn list(&self) -> Result<Vec<Video>, VideoRepositoryError>;

    /// Delete a record, returning it when it existed.
    async fn delete(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError>;
}
