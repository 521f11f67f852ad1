//! Ingested short-form video posts.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse the canonical textual form.
    ///
    /// # Errors
    ///
    /// Returns [`uuid::Error`] when `raw` is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored video post.
///
/// ## Invariants
/// - `post_hash` is unique across the store.
/// - every `hashtags` entry starts with `#`.
///
/// Posts are created by ingestion only and never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    /// Upstream natural key.
    pub post_hash: String,
    pub body: String,
    pub comment_count: i64,
    pub like_count: i64,
    /// Tips received upstream.
    pub gift_count: i64,
    pub hashtags: Vec<String>,
    /// Whether the source video is shorter than the moment threshold.
    pub moment: bool,
    pub poster_public_key: String,
    pub username: Option<String>,
    pub video_url: String,
    /// Public path of the captured thumbnail.
    pub screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Whether any hashtag matches `tags` ignoring case.
    #[must_use]
    pub fn has_any_hashtag(&self, tags: &[String]) -> bool {
        self.hashtags
            .iter()
            .any(|own| tags.iter().any(|tag| own.eq_ignore_ascii_case(tag)))
    }
}

static HASHTAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"#\w+").ok());

/// Extract `#word` hashtags from free text, in order of appearance.
///
/// # Examples
/// ```
/// use reelfeed::domain::extract_hashtags;
///
/// assert_eq!(
///     extract_hashtags("sunset #Beach vibes #travel!"),
///     vec!["#Beach".to_owned(), "#travel".to_owned()],
/// );
/// ```
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_PATTERN
        .as_ref()
        .map(|pattern| {
            pattern
                .find_iter(text)
                .map(|found| found.as_str().to_owned())
                .collect()
        })
        .unwrap_or_default()
}
