//! PostgreSQL-backed `PlaylistRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PlaylistRepository, PlaylistRepositoryError};
use crate::domain::{Playlist, PlaylistId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::PlaylistRow;
use super::pool::{DbPool, PoolError};
use super::schema::playlists;

#[derive(Clone)]
pub struct DieselPlaylistRepository {
    pool: DbPool,
}

impl DieselPlaylistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PlaylistRepositoryError {
    map_pool_error(error, PlaylistRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PlaylistRepositoryError {
    map_diesel_error(error, PlaylistRepositoryError::query, PlaylistRepositoryError::connection)
}

fn into_playlists(rows: Vec<PlaylistRow>) -> Result<Vec<Playlist>, PlaylistRepositoryError> {
    rows.into_iter()
        .map(Playlist::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(PlaylistRepositoryError::query)
}

#[async_trait]
impl PlaylistRepository for DieselPlaylistRepository {
    async fn save(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = PlaylistRow::from(playlist);
        diesel::insert_into(playlists::table)
            .values(&row)
            .on_conflict(playlists::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PlaylistId,
    ) -> Result<Option<Playlist>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PlaylistRow> = playlists::table
            .find(id.as_uuid())
            .select(PlaylistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Playlist::try_from)
            .transpose()
            .map_err(PlaylistRepositoryError::query)
    }

    async fn find_by_ids(
        &self,
        ids: &[PlaylistId],
    ) -> Result<Vec<Playlist>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = playlists::table
            .filter(playlists::id.eq_any(ids))
            .select(PlaylistRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_playlists(rows)
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Playlist>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = playlists::table
            .filter(playlists::owner_id.eq(owner.as_ref()))
            .order(playlists::created_at.asc())
            .select(PlaylistRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_playlists(rows)
    }

    async fn delete(&self, id: &PlaylistId) -> Result<bool, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(playlists::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
