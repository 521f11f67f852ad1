//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use reelfeed::inbound::http::images::ImageStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) images: ImageStore,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, images: ImageStore) -> Self {
        Self {
            bind_addr,
            images,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
