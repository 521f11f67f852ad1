//! Video-info records: inspect a URL or record caller-supplied details.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    NewVideo, ThumbnailCapture, ThumbnailCaptureError, VideoLibrary, VideoRepository,
    VideoRepositoryError,
};
use crate::domain::{Error, Video, VideoId};

pub const DUPLICATE_URL_MESSAGE: &str = "Video with the same URL already exists";
pub const VIDEO_NOT_FOUND_MESSAGE: &str = "Video not found";
const CAPTURE_FAILED_MESSAGE: &str = "Failed to process video";
const FAILURE_MESSAGE: &str = "Failed to process video record";

#[derive(Clone)]
pub struct VideoService {
    videos: Arc<dyn VideoRepository>,
    capture: Arc<dyn ThumbnailCapture>,
    clock: Arc<dyn Clock>,
}

impl VideoService {
    /// `capture` is the same adapter ingestion uses for post thumbnails.
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        capture: Arc<dyn ThumbnailCapture>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            videos,
            capture,
            clock,
        }
    }

    async fn save(&self, video: &Video) -> Result<(), Error> {
        self.videos.save(video).await.map_err(map_video_error)
    }
}

fn map_video_error(err: VideoRepositoryError) -> Error {
    match err {
        VideoRepositoryError::Duplicate { .. } => Error::conflict(DUPLICATE_URL_MESSAGE),
        other => {
            error!(error = %other, "video store failure");
            Error::internal(FAILURE_MESSAGE)
        }
    }
}

fn map_capture_error(err: ThumbnailCaptureError) -> Error {
    error!(error = %err, "video capture failed");
    Error::internal(CAPTURE_FAILED_MESSAGE)
}

#[async_trait]
impl VideoLibrary for VideoService {
    async fn inspect(&self, url: &str) -> Result<Video, Error> {
        let captured = self.capture.capture(url).await.map_err(map_capture_error)?;
        let now = self.clock.utc();
        let existing = self.videos.find_by_url(url).await.map_err(map_video_error)?;
        let video = match existing {
            Some(mut stored) => {
                stored.duration = captured.duration_secs;
                stored.screenshot = Some(captured.screenshot_path);
                stored.updated_at = now;
                stored
            }
            None => Video {
                id: VideoId::generate(),
                url: url.to_owned(),
                duration: captured.duration_secs,
                screenshot: Some(captured.screenshot_path),
                created_at: now,
                updated_at: now,
            },
        };
        self.save(&video).await?;
        info!(video_id = %video.id, duration = video.duration, "video inspected");
        Ok(video)
    }

    async fn create(&self, request: NewVideo) -> Result<Video, Error> {
        if self
            .videos
            .find_by_url(&request.url)
            .await
            .map_err(map_video_error)?
            .is_some()
        {
            return Err(Error::conflict(DUPLICATE_URL_MESSAGE));
        }

        let now = self.clock.utc();
        let video = Video {
            id: VideoId::generate(),
            url: request.url,
            duration: request.duration,
            screenshot: request.screenshot,
            created_at: now,
            updated_at: now,
        };
        self.save(&video).await?;
        info!(video_id = %video.id, "video created");
        Ok(video)
    }

    async fn list(&self) -> Result<Vec<Video>, Error> {
        self.videos.list().await.map_err(map_video_error)
    }

    async fn delete(&self, id: &VideoId) -> Result<Video, Error> {
        let removed = self.videos.delete(id).await.map_err(map_video_error)?;
        let video = removed.ok_or_else(|| Error::not_found(VIDEO_NOT_FOUND_MESSAGE))?;
        info!(video_id = %id, "video deleted");
        Ok(video)
    }
}
