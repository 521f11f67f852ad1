//! Backend entry-point: loads settings, wires adapters and services, starts
//! the ingestion schedule and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use reelfeed::domain::ports::{IngestionMetrics, PostIngestion};
#[cfg(not(feature = "metrics"))]
use reelfeed::domain::ports::NoOpIngestionMetrics;
use reelfeed::inbound::http::health::HealthState;
use reelfeed::inbound::http::images::ImageStore;
use reelfeed::inbound::schedule::spawn_ingestion_schedule;
use reelfeed::outbound::capture::{FfmpegThumbnailCapture, FfmpegTools};
#[cfg(feature = "metrics")]
use reelfeed::outbound::metrics::PrometheusIngestionMetrics;
use reelfeed::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use reelfeed::outbound::upstream::HttpPostSource;
use reelfeed::settings::AppSettings;

use server::{IngestionAdapters, ServerConfig, Stores, build_feed_cache, build_services};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let bind_addr = settings.bind_addr()?;

    let stores = match settings.database_url() {
        Some(url) => {
            run_migrations(url)
                .await
                .wrap_err("failed to run database migrations")?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to create database pool")?;
            info!("store: postgres");
            Stores::diesel(&pool)
        }
        None => {
            warn!("no database URL configured; using in-memory stores");
            Stores::in_memory()
        }
    };
    let cache = build_feed_cache(&settings).await;

    let screenshot_dir = settings.screenshot_dir().to_path_buf();
    let capture = FfmpegThumbnailCapture::new(&screenshot_dir, FfmpegTools::default())
        .wrap_err("failed to prepare screenshot directory")?;
    let images = ImageStore::open(&screenshot_dir).wrap_err("failed to open screenshot directory")?;
    let source = HttpPostSource::new(settings.upstream_url()?, settings.upstream_timeout())
        .wrap_err("failed to build upstream client")?;

    #[cfg(feature = "metrics")]
    let prometheus = PrometheusMetricsBuilder::new("reelfeed")
        .endpoint("/metrics")
        .build()
        .map_err(|e| eyre!("failed to configure Prometheus metrics: {e}"))?;
    #[cfg(feature = "metrics")]
    let metrics: Arc<dyn IngestionMetrics> = Arc::new(
        PrometheusIngestionMetrics::new(&prometheus.registry)
            .wrap_err("ingestion metrics registration failed")?,
    );
    #[cfg(not(feature = "metrics"))]
    let metrics: Arc<dyn IngestionMetrics> = Arc::new(NoOpIngestionMetrics);

    let services = build_services(
        stores,
        cache,
        IngestionAdapters {
            source: Arc::new(source),
            capture: Arc::new(capture),
            metrics,
            config: settings.ingestion_config(),
        },
    );

    let schedule = settings.ingest_interval().map(|interval| {
        info!(interval_secs = interval.as_secs(), "ingestion schedule enabled");
        let job: Arc<dyn PostIngestion> = services.ingestion.clone();
        spawn_ingestion_schedule(job, interval)
    });

    let config = ServerConfig::new(bind_addr, images);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(prometheus);

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state.clone(), services.http_state, config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;

    health_state.mark_unhealthy();
    if let Some(handle) = schedule {
        handle.abort();
    }
    outcome.wrap_err("server terminated with an error")
}
