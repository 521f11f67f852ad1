//! Normalised hashtags and their running post counts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hashtag identifier, referenced by user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashtagId(Uuid);

impl HashtagId {
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

impl fmt::Display for HashtagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tag stored without its `#` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hashtag {
    pub id: HashtagId,
    /// Lowercase name without the leading `#`.
    pub name: String,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hashtag {
    /// The `#`-prefixed form used on posts.
    #[must_use]
    pub fn as_post_tag(&self) -> String {
        format!("#{}", self.name)
    }
}

/// Occurrence count of a post hashtag across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub count: i64,
}

/// Strip leading `#` characters and lowercase.
///
/// Returns `None` when nothing remains.
///
/// # Examples
/// ```
/// use reelfeed::domain::normalize_tag;
///
/// assert_eq!(normalize_tag("#Travel"), Some("travel".to_owned()));
/// assert_eq!(normalize_tag("#"), None);
/// ```
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let name = raw.trim().trim_start_matches('#').to_lowercase();
    (!name.is_empty()).then_some(name)
}
