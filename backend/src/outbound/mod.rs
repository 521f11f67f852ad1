//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process stores and feed cache for local runs and tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **cache**: Redis-backed feed cache
//! - **upstream**: reqwest client for the social API
//! - **capture**: ffmpeg thumbnail capture
//! - **metrics**: Prometheus-backed ingestion counters (feature-gated)
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod capture;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod upstream;
