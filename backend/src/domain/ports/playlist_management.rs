//! Driving port for playlist operations.

use async_trait::async_trait;

use crate::domain::{Error, Playlist, PlaylistId, PlaylistWithPosts, PostId, UserId};

/// Input for creating a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub owner_id: UserId,
    pub post_ids: Vec<PostId>,
}

/// Input for renaming a playlist and optionally replacing its posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlaylistRequest {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub post_ids: Option<Vec<PostId>>,
}

/// Input for adding or removing posts across several playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPlaylistRequest {
    pub owner_id: UserId,
    pub playlist_ids: Vec<PlaylistId>,
    pub post_ids: Vec<PostId>,
}

/// Ownership is checked on every mutation: acting on someone else's
/// playlist yields `unauthorized`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistManagement: Send + Sync {
    /// Create a playlist; `unprocessable_entity` when the owner is unknown.
    async fn create(&self, request: CreatePlaylistRequest) -> Result<Playlist, Error>;

    /// Rename and optionally replace posts.
    async fn update(&self, request: UpdatePlaylistRequest) -> Result<Playlist, Error>;

    /// Delete a playlist owned by `owner_id`.
    async fn delete(&self, id: &PlaylistId, owner_id: &UserId) -> Result<(), Error>;

    /// One playlist with posts, or `not_found`.
    async fn get(&self, id: &PlaylistId) -> Result<PlaylistWithPosts, Error>;

    /// Every playlist owned by `owner_id`, with posts.
    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<PlaylistWithPosts>, Error>;

    /// Add posts to every listed playlist, skipping ones already present.
    async fn add_posts(&self, request: BulkPlaylistRequest) -> Result<Vec<Playlist>, Error>;

    /// Remove posts from every listed playlist.
    async fn remove_posts(&self, request: BulkPlaylistRequest) -> Result<Vec<Playlist>, Error>;
}
