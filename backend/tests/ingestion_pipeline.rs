//! Ingestion runs end to end over the in-memory post store with stub
//! upstream and capture adapters.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reelfeed::domain::ingestion::{IngestionConfig, IngestionJob};
use reelfeed::domain::ports::{
    CapturedThumbnail, NoOpIngestionMetrics, PostCandidate, PostIngestion, PostSource,
    PostSourceError, ThumbnailCapture, ThumbnailCaptureError,
};
use reelfeed::outbound::memory::MemoryPostStore;
use reelfeed::test_support::clock::MutableClock;
use rstest::rstest;

/// Upstream returning whatever the test last queued.
#[derive(Default)]
struct QueuedSource {
    batch: Mutex<Vec<PostCandidate>>,
}

impl QueuedSource {
    fn queue(&self, candidates: Vec<PostCandidate>) {
        *self.batch.lock().expect("source lock") = candidates;
    }
}

#[async_trait]
impl PostSource for QueuedSource {
    async fn fetch_candidates(&self, count: u32) -> Result<Vec<PostCandidate>, PostSourceError> {
        let batch = self.batch.lock().expect("source lock").clone();
        Ok(batch.into_iter().take(count as usize).collect())
    }
}

/// Capture reporting a fixed duration; URLs containing `broken` fail.
struct FixedCapture {
    duration_secs: f64,
}

#[async_trait]
impl ThumbnailCapture for FixedCapture {
    async fn capture(&self, video_url: &str) -> Result<CapturedThumbnail, ThumbnailCaptureError> {
        if video_url.contains("broken") {
            return Err(ThumbnailCaptureError::probe("no video stream"));
        }
        Ok(CapturedThumbnail {
            duration_secs: self.duration_secs,
            screenshot_path: format!("/images/{}.png", video_url.len()),
        })
    }
}

fn candidate(hash: &str, video: &str) -> PostCandidate {
    PostCandidate {
        post_hash: hash.to_owned(),
        body: format!("clip {hash} #Travel #fun"),
        poster_public_key: "P1".to_owned(),
        video_urls: vec![video.to_owned()],
        ..PostCandidate::default()
    }
}

struct Harness {
    source: Arc<QueuedSource>,
    store: Arc<MemoryPostStore>,
    clock: Arc<MutableClock>,
    job: IngestionJob,
}

fn harness(max_post_count: u64, duration_secs: f64) -> Harness {
    let source = Arc::new(QueuedSource::default());
    let store = Arc::new(MemoryPostStore::new());
    let clock = Arc::new(MutableClock::fixed());
    let job = IngestionJob::new(
        source.clone(),
        Arc::new(FixedCapture { duration_secs }),
        store.clone(),
        Arc::new(NoOpIngestionMetrics),
        clock.clone(),
        IngestionConfig {
            fetch_count: 300,
            max_post_count,
            moment_threshold_secs: 10.0,
            capture_timeout: Duration::from_secs(5),
        },
    );
    Harness {
        source,
        store,
        clock,
        job,
    }
}

#[rstest]
#[tokio::test]
async fn repeated_runs_store_each_hash_once() {
    let h = harness(100, 30.0);
    h.source.queue(vec![
        candidate("a", "https://v/a.mp4"),
        candidate("b", "https://v/b.mp4"),
        candidate("novideo", " "),
    ]);

    let first = h.job.ingest().await.expect("first run");
    assert_eq!(first.fetched, 3);
    assert_eq!(first.with_video, 2);
    assert_eq!(first.created.len(), 2);

    h.clock.advance_seconds(60);
    let second = h.job.ingest().await.expect("second run");
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, 2);
    assert_eq!(h.store.snapshot().expect("snapshot").len(), 2);
}

#[rstest]
#[tokio::test]
async fn store_is_trimmed_to_cap_by_age() {
    let h = harness(2, 30.0);
    h.source.queue(vec![candidate("old", "https://v/old.mp4")]);
    h.job.ingest().await.expect("first run");

    h.clock.advance_seconds(60);
    h.source.queue(vec![
        candidate("new1", "https://v/new1.mp4"),
        candidate("new2", "https://v/new2.mp4"),
    ]);
    let report = h.job.ingest().await.expect("second run");

    assert_eq!(report.evicted, 1);
    let mut hashes: Vec<String> = h
        .store
        .snapshot()
        .expect("snapshot")
        .into_iter()
        .map(|post| post.post_hash)
        .collect();
    hashes.sort();
    assert_eq!(hashes, vec!["new1", "new2"]);
}

#[rstest]
#[tokio::test]
async fn capture_failures_are_counted_and_not_stored() {
    let h = harness(100, 30.0);
    h.source.queue(vec![
        candidate("ok", "https://v/ok.mp4"),
        candidate("bad", "https://v/broken.mp4"),
    ]);

    let report = h.job.ingest().await.expect("run");

    assert_eq!(report.created.len(), 1);
    assert_eq!(report.failed, 1);
    let stored = h.store.snapshot().expect("snapshot");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].post_hash, "ok");
}

#[rstest]
#[case::short_clip(4.0, true)]
#[case::long_clip(45.0, false)]
#[tokio::test]
async fn short_videos_become_moments(#[case] duration_secs: f64, #[case] moment: bool) {
    let h = harness(100, duration_secs);
    h.source.queue(vec![candidate("clip", "https://v/clip.mp4")]);

    let report = h.job.ingest().await.expect("run");

    let post = &report.created[0];
    assert_eq!(post.moment, moment);
    assert_eq!(post.hashtags, vec!["#Travel".to_owned(), "#fun".to_owned()]);
    assert!(post.screenshot.is_some());
}
