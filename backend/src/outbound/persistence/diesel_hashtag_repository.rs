//! PostgreSQL-backed `HashtagRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{HashtagRepository, HashtagRepositoryError};
use crate::domain::{Hashtag, HashtagId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::HashtagRow;
use super::pool::{DbPool, PoolError};
use super::schema::hashtags;

diesel::define_sql_function!(fn lower(value: Text) -> Text);

#[derive(Clone)]
pub struct DieselHashtagRepository {
    pool: DbPool,
}

impl DieselHashtagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HashtagRepositoryError {
    map_pool_error(error, HashtagRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> HashtagRepositoryError {
    map_diesel_error(error, HashtagRepositoryError::query, HashtagRepositoryError::connection)
}

#[async_trait]
impl HashtagRepository for DieselHashtagRepository {
    async fn find_by_ids(&self, ids: &[HashtagId]) -> Result<Vec<Hashtag>, HashtagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<HashtagRow> = hashtags::table
            .filter(hashtags::id.eq_any(ids))
            .select(HashtagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Hashtag::from).collect())
    }

    async fn list_by_usage(
        &self,
        excluded_names: &[String],
        limit: u32,
    ) -> Result<Vec<Hashtag>, HashtagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let lowered: Vec<String> = excluded_names.iter().map(|name| name.to_lowercase()).collect();
        let rows: Vec<HashtagRow> = hashtags::table
            .filter(lower(hashtags::name).ne_all(lowered))
            .order((hashtags::post_count.asc(), hashtags::name.asc()))
            .limit(i64::from(limit))
            .select(HashtagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Hashtag::from).collect())
    }

    async fn increment(
        &self,
        name: &str,
        count: i64,
        now: DateTime<Utc>,
    ) -> Result<Hashtag, HashtagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = HashtagRow {
            id: *HashtagId::generate().as_uuid(),
            name: name.to_owned(),
            post_count: count,
            created_at: now,
            updated_at: now,
        };
        let stored: HashtagRow = diesel::insert_into(hashtags::table)
            .values(&row)
            .on_conflict(hashtags::name)
            .do_update()
            .set((
                hashtags::post_count.eq(hashtags::post_count + excluded(hashtags::post_count)),
                hashtags::updated_at.eq(excluded(hashtags::updated_at)),
            ))
            .returning(HashtagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(stored.into())
    }
}
