//! Scrape-and-dedupe ingestion job.
//!
//! One run fetches recent upstream posts, keeps those with a playable video,
//! captures a thumbnail for each unseen post hash and stores the result.
//! After the batch the store is trimmed back to its cap by deleting the
//! oldest posts. A single-run guard rejects overlapping runs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CapturedThumbnail, IngestionMetrics, PostCandidate, PostIngestion, PostRepository,
    PostRepositoryError, PostSource, PostSourceError, ThumbnailCapture,
};
use crate::domain::{Error, Post, PostId, extract_hashtags};

/// Public message for upstream or store failures during a run.
pub const INGESTION_FAILED_MESSAGE: &str = "Failed to create post";
/// Public message when a run is already in progress.
pub const ALREADY_RUNNING_MESSAGE: &str = "ingestion is already running";

/// Tunables for one ingestion job.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionConfig {
    /// Upstream posts requested per run.
    pub fetch_count: u32,
    /// Store size after eviction.
    pub max_post_count: u64,
    /// Videos shorter than this are moments.
    pub moment_threshold_secs: f64,
    /// Upper bound for one capture.
    pub capture_timeout: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            fetch_count: 300,
            max_post_count: 1000,
            moment_threshold_secs: 10.0,
            capture_timeout: Duration::from_secs(60),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    /// Candidates returned by upstream.
    pub fetched: u64,
    /// Candidates exposing a playable video.
    pub with_video: u64,
    /// Posts stored by this run.
    pub created: Vec<Post>,
    /// Candidates whose hash was already stored.
    pub skipped: u64,
    /// Candidates whose capture failed or timed out.
    pub failed: u64,
    /// Posts deleted to respect the cap.
    pub evicted: u64,
}

/// Per-candidate result inside a run.
enum ItemOutcome {
    Created(Box<Post>),
    Skipped,
    Failed,
}

/// Ingestion job implementing [`PostIngestion`].
#[derive(Clone)]
pub struct IngestionJob {
    source: Arc<dyn PostSource>,
    capture: Arc<dyn ThumbnailCapture>,
    posts: Arc<dyn PostRepository>,
    metrics: Arc<dyn IngestionMetrics>,
    clock: Arc<dyn Clock>,
    config: IngestionConfig,
    running: Arc<Mutex<()>>,
}

impl IngestionJob {
    /// Assemble a job from its adapters and the store size policy in `config`.
    pub fn new(
        source: Arc<dyn PostSource>,
        capture: Arc<dyn ThumbnailCapture>,
        posts: Arc<dyn PostRepository>,
        metrics: Arc<dyn IngestionMetrics>,
        clock: Arc<dyn Clock>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            source,
            capture,
            posts,
            metrics,
            clock,
            config,
            running: Arc::new(Mutex::new(())),
        }
    }

    async fn run(&self) -> Result<IngestionReport, Error> {
        let candidates = self
            .source
            .fetch_candidates(self.config.fetch_count)
            .await
            .map_err(map_source_error)?;
        let mut report = IngestionReport {
            fetched: count(candidates.len()),
            ..IngestionReport::default()
        };

        let playable: Vec<(PostCandidate, String)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let url = candidate.video_url()?.to_owned();
                Some((candidate, url))
            })
            .collect();
        report.with_video = count(playable.len());

        for (candidate, video_url) in playable {
            match self.process(candidate, video_url).await? {
                ItemOutcome::Created(post) => report.created.push(*post),
                ItemOutcome::Skipped => report.skipped += 1,
                ItemOutcome::Failed => report.failed += 1,
            }
        }

        report.evicted = self.evict().await?;
        Ok(report)
    }

    async fn process(
        &self,
        candidate: PostCandidate,
        video_url: String,
    ) -> Result<ItemOutcome, Error> {
        if self
            .posts
            .exists_by_hash(&candidate.post_hash)
            .await
            .map_err(map_store_error)?
        {
            return Ok(ItemOutcome::Skipped);
        }

        let captured = match tokio::time::timeout(
            self.config.capture_timeout,
            self.capture.capture(&video_url),
        )
        .await
        {
            Ok(Ok(captured)) => captured,
            Ok(Err(err)) => {
                warn!(post_hash = %candidate.post_hash, error = %err, "thumbnail capture failed");
                return Ok(ItemOutcome::Failed);
            }
            Err(_) => {
                warn!(
                    post_hash = %candidate.post_hash,
                    timeout_secs = self.config.capture_timeout.as_secs(),
                    "thumbnail capture timed out"
                );
                return Ok(ItemOutcome::Failed);
            }
        };

        let post = self.build_post(candidate, video_url, captured);
        let inserted = self
            .posts
            .insert_if_absent(&post)
            .await
            .map_err(map_store_error)?;
        if inserted {
            Ok(ItemOutcome::Created(Box::new(post)))
        } else {
            Ok(ItemOutcome::Skipped)
        }
    }

    fn build_post(
        &self,
        candidate: PostCandidate,
        video_url: String,
        captured: CapturedThumbnail,
    ) -> Post {
        Post {
            id: PostId::generate(),
            hashtags: extract_hashtags(&candidate.body),
            post_hash: candidate.post_hash,
            body: candidate.body,
            comment_count: candidate.comment_count,
            like_count: candidate.like_count,
            gift_count: candidate.gift_count,
            moment: captured.duration_secs < self.config.moment_threshold_secs,
            poster_public_key: candidate.poster_public_key,
            username: candidate.username,
            video_url,
            screenshot: Some(captured.screenshot_path),
            created_at: self.clock.utc(),
        }
    }

    async fn evict(&self) -> Result<u64, Error> {
        let total = self.posts.count_all().await.map_err(map_store_error)?;
        if total <= self.config.max_post_count {
            return Ok(0);
        }
        self.posts
            .delete_oldest(total - self.config.max_post_count)
            .await
            .map_err(map_store_error)
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn map_source_error(err: PostSourceError) -> Error {
    error!(error = %err, "upstream fetch failed");
    Error::internal(INGESTION_FAILED_MESSAGE)
}

fn map_store_error(err: PostRepositoryError) -> Error {
    error!(error = %err, "post store failure during ingestion");
    Error::internal(INGESTION_FAILED_MESSAGE)
}

#[async_trait]
impl PostIngestion for IngestionJob {
    async fn ingest(&self) -> Result<IngestionReport, Error> {
        let Ok(_running) = self.running.try_lock() else {
            warn!("ingestion run rejected: another run is in progress");
            return Err(Error::conflict(ALREADY_RUNNING_MESSAGE));
        };

        match self.run().await {
            Ok(report) => {
                info!(
                    fetched = report.fetched,
                    with_video = report.with_video,
                    created = report.created.len(),
                    skipped = report.skipped,
                    failed = report.failed,
                    evicted = report.evicted,
                    "ingestion run finished"
                );
                if let Err(err) = self.metrics.record_run(&report).await {
                    warn!(error = %err, "failed to record ingestion metrics");
                }
                Ok(report)
            }
            Err(err) => {
                if let Err(metrics_err) = self.metrics.record_failure().await {
                    warn!(error = %metrics_err, "failed to record ingestion metrics");
                }
                Err(err)
            }
        }
    }
}
