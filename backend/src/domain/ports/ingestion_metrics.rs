//! Domain port surface for ingestion run counters.
//!
//! Adapters emit Prometheus counters without the ingestion job knowing about
//! the exporter.

use async_trait::async_trait;

use crate::domain::ingestion::IngestionReport;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording ingestion metrics.
    pub enum IngestionMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "ingestion metrics exporter failed: {message}",
    }
}

/// Metrics recording port for ingestion runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngestionMetrics: Send + Sync {
    /// Record one completed run.
    async fn record_run(&self, report: &IngestionReport) -> Result<(), IngestionMetricsError>;

    /// Record a run that failed before processing any candidate.
    async fn record_failure(&self) -> Result<(), IngestionMetricsError>;
}

/// No-op implementation used when metrics are disabled or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpIngestionMetrics;

#[async_trait]
impl IngestionMetrics for NoOpIngestionMetrics {
    async fn record_run(&self, _report: &IngestionReport) -> Result<(), IngestionMetricsError> {
        Ok(())
    }

    async fn record_failure(&self) -> Result<(), IngestionMetricsError> {
        Ok(())
    }
}
