//! Driving port for video-info records.

use async_trait::async_trait;

use crate::domain::{Error, Video, VideoId};

/// Caller-supplied video details.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub url: String,
    pub duration: f64,
    pub screenshot: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoLibrary: Send + Sync {
    /// Capture `url` for its duration and a screenshot, then record the result.
    ///
    /// Inspecting a URL that is already stored refreshes that record.
    async fn inspect(&self, url: &str) -> Result<Video, Error>;

    /// Record caller-supplied details; `conflict` when the URL is stored.
    async fn create(&self, video: NewVideo) -> Result<Video, Error>;

    async fn list(&self) -> Result<Vec<Video>, Error>;

    /// Delete a record and return it, or `not_found`.
    async fn delete(&self, id: &VideoId) -> Result<Video, Error>;
}
