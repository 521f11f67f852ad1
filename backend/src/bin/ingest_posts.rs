//! Run one ingestion pass against the configured store and upstream API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use reelfeed::domain::ingestion::IngestionJob;
use reelfeed::domain::ports::{NoOpIngestionMetrics, PostIngestion};
use reelfeed::outbound::capture::{FfmpegThumbnailCapture, FfmpegTools};
use reelfeed::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
use reelfeed::outbound::upstream::HttpPostSource;
use reelfeed::settings::AppSettings;
use tokio::runtime::Builder;

/// `ingest-posts` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ingest-posts",
    about = "Fetch recent upstream video posts, capture thumbnails and store new ones",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `REELFEED_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Upstream posts to request, overriding the configured count.
    #[arg(long = "fetch-count", value_name = "count")]
    fetch_count: Option<u32>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = AppSettings::load_from_iter([OsString::from("ingest-posts")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let database_url = resolve_database_url(args.database_url, settings.database_url())?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let upstream_url = settings.upstream_url().map_err(io::Error::other)?;
    let source = HttpPostSource::new(upstream_url, settings.upstream_timeout())
        .map_err(|error| io::Error::other(format!("build upstream client: {error}")))?;
    let capture = FfmpegThumbnailCapture::new(settings.screenshot_dir(), FfmpegTools::default())
        .map_err(io::Error::other)?;

    let mut config = settings.ingestion_config();
    if let Some(fetch_count) = args.fetch_count {
        config.fetch_count = fetch_count;
    }

    let job = IngestionJob::new(
        Arc::new(source),
        Arc::new(capture),
        Arc::new(DieselPostRepository::new(pool)),
        Arc::new(NoOpIngestionMetrics),
        Arc::new(DefaultClock),
        config,
    );
    let report = job
        .ingest()
        .await
        .map_err(|error| io::Error::other(format!("ingestion failed: {error}")))?;

    println!("fetched={}", report.fetched);
    println!("with_video={}", report.with_video);
    println!("created={}", report.created.len());
    println!("skipped={}", report.skipped);
    println!("failed={}", report.failed);
    println!("evicted={}", report.evicted);

    Ok(())
}

fn resolve_database_url(explicit: Option<String>, configured: Option<&str>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }
    configured.map(str::to_owned).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or REELFEED_DATABASE_URL",
        )
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::{CliArgs, resolve_database_url};

    #[rstest]
    fn explicit_database_url_wins() {
        let url = resolve_database_url(Some("postgres://cli".into()), Some("postgres://env"))
            .expect("url should resolve");
        assert_eq!(url, "postgres://cli");
    }

    #[rstest]
    fn configured_database_url_is_fallback() {
        let url = resolve_database_url(None, Some("postgres://env")).expect("url should resolve");
        assert_eq!(url, "postgres://env");
    }

    #[rstest]
    #[case(Some("  ".to_owned()), Some("postgres://env"))]
    #[case(None, None)]
    fn missing_or_blank_database_url_is_rejected(
        #[case] explicit: Option<String>,
        #[case] configured: Option<&str>,
    ) {
        let error = resolve_database_url(explicit, configured).expect_err("url should fail");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn fetch_count_flag_parses() {
        let args = CliArgs::try_parse_from(["ingest-posts", "--fetch-count", "50"])
            .expect("args should parse");
        assert_eq!(args.fetch_count, Some(50));
        assert!(args.database_url.is_none());
    }
}
