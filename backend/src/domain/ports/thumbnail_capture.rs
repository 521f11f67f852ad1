//! Driven port for probing a video and capturing a thumbnail.
use async_trait::async_trait;

use super::define_port_error;

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedThumbnail {
    /// Source video duration.
    pub duration_secs: f64,
    /// Public path of the stored image, e.g. `/images/<name>.png`.
    pub screenshot_path: String,
}

define_port_error! {
    /// Errors raised for a single capture attempt.
    pub enum ThumbnailCaptureError {
        /// The video could not be probed for its duration.
        Probe { message: String } => "video probe failed: {message}",
        /// The frame grab failed.
        Snapshot { message: String } => "thumbnail capture failed: {message}",
        /// The screenshot directory could not be prepared.
        Storage { message: String } => "screenshot storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThumbnailCapture: Send + Sync {
    /// Probe `video_url` and store a frame taken about one second in.
    async fn capture(&self, video_url: &str) -> Result<CapturedThumbnail, ThumbnailCaptureError>;
}
