//! Prometheus adapter for ingestion run counters.
//!
//! `ingestion_runs_total` counts runs by status; `ingestion_posts_total`
//! counts per-candidate outcomes across runs.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::ingestion::IngestionReport;
use crate::domain::ports::{IngestionMetrics, IngestionMetricsError};

/// Prometheus-backed recorder for ingestion outcomes.
pub struct PrometheusIngestionMetrics {
    runs_total: IntCounterVec,
    posts_total: IntCounterVec,
}

impl PrometheusIngestionMetrics {
    /// Create and register counters with the provided registry.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects metric registration.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let runs_total = IntCounterVec::new(
            Opts::new("ingestion_runs_total", "Ingestion runs by status"),
            &["status"],
        )?;
        let posts_total = IntCounterVec::new(
            Opts::new("ingestion_posts_total", "Ingested candidates by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(posts_total.clone()))?;
        Ok(Self {
            runs_total,
            posts_total,
        })
    }
}

#[async_trait]
impl IngestionMetrics for PrometheusIngestionMetrics {
    async fn record_run(&self, report: &IngestionReport) -> Result<(), IngestionMetricsError> {
        self.runs_total.with_label_values(&["success"]).inc();
        let created = u64::try_from(report.created.len()).unwrap_or(u64::MAX);
        for (outcome, count) in [
            ("created", created),
            ("skipped", report.skipped),
            ("failed", report.failed),
            ("evicted", report.evicted),
        ] {
            self.posts_total.with_label_values(&[outcome]).inc_by(count);
        }
        Ok(())
    }

    async fn record_failure(&self) -> Result<(), IngestionMetricsError> {
        self.runs_total.with_label_values(&["failure"]).inc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::post;
    use rstest::rstest;

    fn make_metrics() -> (Registry, PrometheusIngestionMetrics) {
        let registry = Registry::new();
        let metrics =
            PrometheusIngestionMetrics::new(&registry).expect("metric registration should succeed");
        (registry, metrics)
    }

    #[rstest]
    #[tokio::test]
    async fn run_outcomes_are_counted() {
        let (registry, metrics) = make_metrics();
        let report = IngestionReport {
            fetched: 5,
            with_video: 4,
            created: vec![post("a", "P", 0), post("b", "P", 1)],
            skipped: 1,
            failed: 1,
            evicted: 3,
        };

        metrics.record_run(&report).await.expect("record");

        assert_eq!(metrics.runs_total.with_label_values(&["success"]).get(), 1);
        assert_eq!(metrics.posts_total.with_label_values(&["created"]).get(), 2);
        assert_eq!(metrics.posts_total.with_label_values(&["evicted"]).get(), 3);
        assert!(
            registry
                .gather()
                .iter()
                .any(|family| family.name() == "ingestion_posts_total")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failures_count_as_failed_runs() {
        let (_registry, metrics) = make_metrics();
        metrics.record_failure().await.expect("record");
        assert_eq!(metrics.runs_total.with_label_values(&["failure"]).get(), 1);
        assert_eq!(metrics.runs_total.with_label_values(&["success"]).get(), 0);
    }
}
