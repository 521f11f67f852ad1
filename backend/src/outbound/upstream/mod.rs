//! Upstream social API adapter.

mod dto;
mod http_source;

pub use http_source::HttpPostSource;
