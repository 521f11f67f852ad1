//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `REELFEED_*` environment variables and an
//! optional configuration file. Every field is optional; accessors supply
//! the defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ingestion::IngestionConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_URL: &str = "https://node.deso.org/api/v0/get-posts-stateless";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SCREENSHOT_DIR: &str = "public/images";
const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MOMENT_THRESHOLD_SECS: f64 = 10.0;
const DEFAULT_FETCH_COUNT: u32 = 300;
const DEFAULT_MAX_POST_COUNT: u64 = 1000;
const DEFAULT_FEED_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_INGEST_INTERVAL_SECS: u64 = 600;

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid upstream URL '{value}': {message}")]
    UpstreamUrl { value: String, message: String },
}

/// Server and ingestion configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REELFEED")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Redis URL; the in-memory feed cache is used when absent.
    pub redis_url: Option<String>,
    /// Upstream "get posts" endpoint.
    pub upstream_url: Option<String>,
    pub upstream_timeout_secs: Option<u64>,
    /// Directory thumbnails are written to and served from.
    pub screenshot_dir: Option<PathBuf>,
    pub capture_timeout_secs: Option<u64>,
    /// Videos shorter than this many seconds are moments.
    pub moment_threshold_secs: Option<f64>,
    /// Upstream posts requested per ingestion run.
    pub fetch_count: Option<u32>,
    /// Store size kept after each ingestion run.
    pub max_post_count: Option<u64>,
    pub feed_cache_ttl_secs: Option<u64>,
    /// Seconds between scheduled ingestion runs; `0` disables the schedule.
    pub ingest_interval_secs: Option<u64>,
}

impl AppSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn redis_url(&self) -> Option<&str> {
        non_blank(self.redis_url.as_deref())
    }

    /// Return the upstream endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UpstreamUrl`] when the value is not a URL.
    pub fn upstream_url(&self) -> Result<Url, SettingsError> {
        let raw = self.upstream_url.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL);
        Url::parse(raw).map_err(|err| SettingsError::UpstreamUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upstream_timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        )
    }

    pub fn screenshot_dir(&self) -> &Path {
        self.screenshot_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SCREENSHOT_DIR))
    }

    pub fn feed_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.feed_cache_ttl_secs.unwrap_or(DEFAULT_FEED_CACHE_TTL_SECS))
    }

    /// Interval between scheduled runs, or `None` when scheduling is off.
    pub fn ingest_interval(&self) -> Option<Duration> {
        match self.ingest_interval_secs.unwrap_or(DEFAULT_INGEST_INTERVAL_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Tunables for the ingestion job.
    pub fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            fetch_count: self.fetch_count.unwrap_or(DEFAULT_FETCH_COUNT),
            max_post_count: self.max_post_count.unwrap_or(DEFAULT_MAX_POST_COUNT),
            moment_threshold_secs: self
                .moment_threshold_secs
                .unwrap_or(DEFAULT_MOMENT_THRESHOLD_SECS),
            capture_timeout: Duration::from_secs(
                self.capture_timeout_secs
                    .unwrap_or(DEFAULT_CAPTURE_TIMEOUT_SECS),
            ),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
