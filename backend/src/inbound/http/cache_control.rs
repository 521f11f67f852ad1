//! Shared cache-control policies for HTTP handlers.

/// Thumbnails are written once under a random name and never change.
pub const PUBLIC_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the cache-control header tuple for immutable public assets.
pub const fn immutable_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_IMMUTABLE)
}
