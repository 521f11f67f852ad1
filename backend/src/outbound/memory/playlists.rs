//! In-memory playlist store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{PlaylistRepository, PlaylistRepositoryError};
use crate::domain::{Playlist, PlaylistId, UserId};

use super::lock;

#[derive(Debug, Default)]
pub struct MemoryPlaylistStore {
    playlists: Mutex<Vec<Playlist>>,
}

impl MemoryPlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistRepository for MemoryPlaylistStore {
    async fn save(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut playlists = lock(&self.playlists, PlaylistRepositoryError::query)?;
        match playlists.iter_mut().find(|stored| stored.id == playlist.id) {
            Some(stored) => *stored = playlist.clone(),
            None => playlists.push(playlist.clone()),
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PlaylistId,
    ) -> Result<Option<Playlist>, PlaylistRepositoryError> {
        let playlists = lock(&self.playlists, PlaylistRepositoryError::query)?;
        Ok(playlists.iter().find(|playlist| playlist.id == *id).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[PlaylistId],
    ) -> Result<Vec<Playlist>, PlaylistRepositoryError> {
        let playlists = lock(&self.playlists, PlaylistRepositoryError::query)?;
        Ok(playlists
            .iter()
            .filter(|playlist| ids.contains(&playlist.id))
            .cloned()
            .collect())
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Playlist>, PlaylistRepositoryError> {
        let playlists = lock(&self.playlists, PlaylistRepositoryError::query)?;
        let mut owned: Vec<Playlist> = playlists
            .iter()
            .filter(|playlist| playlist.owner_id == *owner)
            .cloned()
            .collect();
        owned.sort_by_key(|playlist| playlist.created_at);
        Ok(owned)
    }

    async fn delete(&self, id: &PlaylistId) -> Result<bool, PlaylistRepositoryError> {
        let mut playlists = lock(&self.playlists, PlaylistRepositoryError::query)?;
        let before = playlists.len();
        playlists.retain(|playlist| playlist.id != *id);
        Ok(playlists.len() != before)
    }
}
