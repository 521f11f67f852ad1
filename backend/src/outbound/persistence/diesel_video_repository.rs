//! PostgreSQL-backed `VideoRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VideoRepository, VideoRepositoryError};
use crate::domain::{Video, VideoId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::VideoRow;
use super::pool::{DbPool, PoolError};
use super::schema::videos;

#[derive(Clone)]
pub struct DieselVideoRepository {
    pool: DbPool,
}

impl DieselVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> VideoRepositoryError {
    map_pool_error(error, VideoRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> VideoRepositoryError {
    map_diesel_error(error, VideoRepositoryError::query, VideoRepositoryError::connection)
}

#[async_trait]
impl VideoRepository for DieselVideoRepository {
    async fn save(&self, video: &Video) -> Result<(), VideoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = VideoRow::from(video);
        diesel::insert_into(videos::table)
            .values(&row)
            .on_conflict(videos::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    VideoRepositoryError::duplicate(video.url.clone())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Video>, VideoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<VideoRow> = videos::table
            .filter(videos::url.eq(url))
            .select(VideoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(Video::from))
    }

    async fn list(&self) -> Result<Vec<Video>, VideoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<VideoRow> = videos::table
            .order(videos::created_at.asc())
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    async fn delete(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<VideoRow> = diesel::delete(videos::table.find(id.as_uuid()))
            .returning(VideoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(Video::from))
    }
}
