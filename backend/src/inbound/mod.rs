//! Inbound adapters that translate external triggers (HTTP requests and the
//! ingestion timer) into domain service calls.

pub mod http;
pub mod schedule;
