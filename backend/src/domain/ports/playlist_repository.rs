//! Port abstraction for playlist persistence.
use async_trait::async_trait;

use crate::domain::{Playlist, PlaylistId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by playlist store adapters.
    pub enum PlaylistRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "playlist store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "playlist store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Insert or replace a playlist.
    async fn save(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError>;

    /// Fetch one playlist.
    async fn find_by_id(
        &self,
        id: &PlaylistId,
    ) -> Result<Option<Playlist>, PlaylistRepositoryError>;

    /// Playlists with the given ids; missing ids are skipped.
    async fn find_by_ids(
        &self,
        ids: &[PlaylistId],
    ) -> Result<Vec<Playlist>, PlaylistRepositoryError>;

    /// Playlists owned by `owner`, oldest first.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Playlist>, PlaylistRepositoryError>;

    /// Delete a playlist. Returns whether it existed.
    async fn delete(&self, id: &PlaylistId) -> Result<bool, PlaylistRepositoryError>;
}
