//! Reelfeed backend library.
//!
//! Hexagonal layout: [`domain`] owns entities, services and ports;
//! [`outbound`] implements the driven ports (PostgreSQL, Redis, upstream
//! HTTP, ffmpeg); [`inbound`] exposes the driving ports over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
