//! Playlist management with ownership checks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    BulkPlaylistRequest, CreatePlaylistRequest, PlaylistManagement, PlaylistRepository,
    PlaylistRepositoryError, PostRepository, PostRepositoryError, UpdatePlaylistRequest,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, Playlist, PlaylistId, PlaylistWithPosts, PostId, UserId, dedupe_post_ids,
};

pub const PLAYLIST_NOT_FOUND_MESSAGE: &str = "playlist not found";
pub const OWNER_NOT_FOUND_MESSAGE: &str = "user not found";
pub const NOT_OWNER_MESSAGE: &str = "unauthorized";
const FAILURE_MESSAGE: &str = "sorry something went wrong";

#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepository>,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl PlaylistService {
    pub fn new(
        playlists: Arc<dyn PlaylistRepository>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            playlists,
            users,
            posts,
            clock,
        }
    }

    async fn find(&self, id: &PlaylistId) -> Result<Playlist, Error> {
        self.playlists
            .find_by_id(id)
            .await
            .map_err(map_playlist_error)?
            .ok_or_else(|| Error::not_found(PLAYLIST_NOT_FOUND_MESSAGE))
    }

    async fn find_owned(&self, id: &PlaylistId, owner_id: &UserId) -> Result<Playlist, Error> {
        let playlist = self.find(id).await?;
        ensure_owner(&playlist, owner_id)?;
        Ok(playlist)
    }

    /// Load every listed playlist and check ownership before any change is
    /// written, so a bulk request either applies everywhere or nowhere.
    async fn find_all_owned(
        &self,
        ids: &[PlaylistId],
        owner_id: &UserId,
    ) -> Result<Vec<Playlist>, Error> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            found.push(self.find_owned(id, owner_id).await?);
        }
        Ok(found)
    }

    async fn with_posts(&self, playlists: Vec<Playlist>) -> Result<Vec<PlaylistWithPosts>, Error> {
        let ids: Vec<PostId> = playlists
            .iter()
            .flat_map(|playlist| playlist.post_ids.iter().copied())
            .collect();
        let posts = if ids.is_empty() {
            Vec::new()
        } else {
            self.posts
                .find_by_ids(&dedupe_post_ids(ids))
                .await
                .map_err(map_post_error)?
        };
        Ok(playlists
            .into_iter()
            .map(|playlist| PlaylistWithPosts::assemble(playlist, &posts))
            .collect())
    }

    async fn save_all(&self, playlists: &[Playlist]) -> Result<(), Error> {
        for playlist in playlists {
            self.playlists
                .save(playlist)
                .await
                .map_err(map_playlist_error)?;
        }
        Ok(())
    }
}

fn ensure_owner(playlist: &Playlist, owner_id: &UserId) -> Result<(), Error> {
    if playlist.owner_id == *owner_id {
        Ok(())
    } else {
        Err(Error::unauthorized(NOT_OWNER_MESSAGE))
    }
}

fn map_playlist_error(err: PlaylistRepositoryError) -> Error {
    error!(error = %err, "playlist store failure");
    Error::internal(FAILURE_MESSAGE)
}

fn map_post_error(err: PostRepositoryError) -> Error {
    error!(error = %err, "post store failure while resolving playlist posts");
    Error::internal(FAILURE_MESSAGE)
}

fn map_user_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store failure while checking playlist owner");
    Error::internal(FAILURE_MESSAGE)
}

#[async_trait]
impl PlaylistManagement for PlaylistService {
    async fn create(&self, request: CreatePlaylistRequest) -> Result<Playlist, Error> {
        let owner = self
            .users
            .find_by_id(&request.owner_id)
            .await
            .map_err(map_user_error)?;
        if owner.is_none() {
            return Err(Error::unprocessable(OWNER_NOT_FOUND_MESSAGE));
        }

        let now = self.clock.utc();
        let playlist = Playlist {
            id: PlaylistId::generate(),
            name: request.name,
            owner_id: request.owner_id,
            post_ids: dedupe_post_ids(request.post_ids),
            created_at: now,
            updated_at: now,
        };
        self.playlists
            .save(&playlist)
            .await
            .map_err(map_playlist_error)?;
        info!(playlist_id = %playlist.id, owner_id = %playlist.owner_id, "playlist created");
        Ok(playlist)
    }

    async fn update(&self, request: UpdatePlaylistRequest) -> Result<Playlist, Error> {
        let mut playlist = self.find_owned(&request.id, &request.owner_id).await?;
        playlist.name = request.name;
        if let Some(post_ids) = request.post_ids {
            playlist.post_ids = dedupe_post_ids(post_ids);
        }
        playlist.updated_at = self.clock.utc();
        self.playlists
            .save(&playlist)
            .await
            .map_err(map_playlist_error)?;
        Ok(playlist)
    }

    async fn delete(&self, id: &PlaylistId, owner_id: &UserId) -> Result<(), Error> {
        self.find_owned(id, owner_id).await?;
        let removed = self.playlists.delete(id).await.map_err(map_playlist_error)?;
        if !removed {
            return Err(Error::not_found(PLAYLIST_NOT_FOUND_MESSAGE));
        }
        info!(playlist_id = %id, "playlist deleted");
        Ok(())
    }

    async fn get(&self, id: &PlaylistId) -> Result<PlaylistWithPosts, Error> {
        let playlist = self.find(id).await?;
        let mut assembled = self.with_posts(vec![playlist]).await?;
        assembled
            .pop()
            .ok_or_else(|| Error::not_found(PLAYLIST_NOT_FOUND_MESSAGE))
    }

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<PlaylistWithPosts>, Error> {
        let playlists = self
            .playlists
            .find_by_owner(owner_id)
            .await
            .map_err(map_playlist_error)?;
        self.with_posts(playlists).await
    }

    async fn add_posts(&self, request: BulkPlaylistRequest) -> Result<Vec<Playlist>, Error> {
        let mut playlists = self
            .find_all_owned(&request.playlist_ids, &request.owner_id)
            .await?;
        let now = self.clock.utc();
        for playlist in &mut playlists {
            playlist.add_posts(&request.post_ids);
            playlist.updated_at = now;
        }
        self.save_all(&playlists).await?;
        Ok(playlists)
    }

    async fn remove_posts(&self, request: BulkPlaylistRequest) -> Result<Vec<Playlist>, Error> {
        let mut playlists = self
            .find_all_owned(&request.playlist_ids, &request.owner_id)
            .await?;
        let now = self.clock.utc();
        for playlist in &mut playlists {
            playlist.remove_posts(&request.post_ids);
            playlist.updated_at = now;
        }
        self.save_all(&playlists).await?;
        Ok(playlists)
    }
}

#[cfg(test)]
#[path = "playlist_service_tests.rs"]
mod tests;
