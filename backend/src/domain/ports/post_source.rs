//! Driven port for pulling candidate posts from the upstream social API.
//!
//! The domain owns the candidate shape so ingestion stays independent of the
//! upstream wire format.

use async_trait::async_trait;

use super::define_port_error;

/// One upstream post as seen by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostCandidate {
    /// Upstream natural key.
    pub post_hash: String,
    pub body: String,
    pub comment_count: i64,
    pub like_count: i64,
    pub gift_count: i64,
    pub poster_public_key: String,
    pub username: Option<String>,
    /// Playable URLs in upstream order; entries may be blank.
    pub video_urls: Vec<String>,
}

impl PostCandidate {
    /// First non-blank video URL.
    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_urls
            .iter()
            .map(|url| url.trim())
            .find(|url| !url.is_empty())
    }
}

define_port_error! {
    /// Errors surfaced while calling the upstream API.
    pub enum PostSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } => "upstream transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "upstream timeout: {message}",
        /// Upstream answered with a non-success status.
        Status { status: u16, message: String } => "upstream returned {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "upstream response decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch up to `count` recent posts.
    async fn fetch_candidates(&self, count: u32) -> Result<Vec<PostCandidate>, PostSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first(vec!["a", "b"], Some("a"))]
    #[case::skips_blank(vec!["", "  ", "b"], Some("b"))]
    #[case::none(vec![""], None)]
    #[case::empty(vec![], None)]
    fn picks_first_playable_url(#[case] urls: Vec<&str>, #[case] expected: Option<&str>) {
        let candidate = PostCandidate {
            video_urls: urls.into_iter().map(str::to_owned).collect(),
            ..PostCandidate::default()
        };
        assert_eq!(candidate.video_url(), expected);
    }
}
