//! Prometheus-backed metrics adapters, compiled with the `metrics` feature.

mod prometheus_ingestion;

pub use prometheus_ingestion::PrometheusIngestionMetrics;
