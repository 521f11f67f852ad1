//! User-owned playlists of posts.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Post, PostId, UserId};

/// Playlist identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(Uuid);

impl PlaylistId {
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

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Named, ordered collection of post references.
///
/// ## Invariants
/// - `post_ids` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub post_ids: Vec<PostId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Append posts not already present.
    pub fn add_posts(&mut self, post_ids: &[PostId]) {
        let mut combined = std::mem::take(&mut self.post_ids);
        combined.extend_from_slice(post_ids);
        self.post_ids = dedupe_post_ids(combined);
    }

    /// Remove every occurrence of the given posts.
    pub fn remove_posts(&mut self, post_ids: &[PostId]) {
        let drop: HashSet<&PostId> = post_ids.iter().collect();
        self.post_ids.retain(|id| !drop.contains(id));
    }
}

/// Playlist with its posts resolved, in playlist order.
///
/// Posts evicted from the store are silently absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithPosts {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub posts: Vec<Post>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistWithPosts {
    /// Join a playlist with the posts found for its ids.
    #[must_use]
    pub fn assemble(playlist: Playlist, found: &[Post]) -> Self {
        let posts = playlist
            .post_ids
            .iter()
            .filter_map(|id| found.iter().find(|post| post.id == *id).cloned())
            .collect();
        Self {
            id: playlist.id,
            name: playlist.name,
            owner_id: playlist.owner_id,
            posts,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

/// Drop repeated ids keeping the first occurrence.
#[must_use]
pub fn dedupe_post_ids(ids: Vec<PostId>) -> Vec<PostId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn playlist(post_ids: Vec<PostId>) -> Playlist {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 2, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        Playlist {
            id: PlaylistId::generate(),
            name: "faves".to_owned(),
            owner_id: UserId::new("U1").expect("id"),
            post_ids,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn dedupe_keeps_first_occurrence() {
        let (a, b) = (PostId::generate(), PostId::generate());
        assert_eq!(dedupe_post_ids(vec![a, b, a, b, a]), vec![a, b]);
    }

    #[rstest]
    fn add_posts_skips_existing() {
        let (a, b, c) = (PostId::generate(), PostId::generate(), PostId::generate());
        let mut list = playlist(vec![a, b]);
        list.add_posts(&[b, c, c]);
        assert_eq!(list.post_ids, vec![a, b, c]);
    }

    #[rstest]
    fn remove_posts_drops_all_matches() {
        let (a, b) = (PostId::generate(), PostId::generate());
        let mut list = playlist(vec![a, b]);
        list.remove_posts(&[a]);
        assert_eq!(list.post_ids, vec![b]);
    }
}
