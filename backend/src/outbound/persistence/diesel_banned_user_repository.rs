//! PostgreSQL-backed `BannedUserRepository`.
//!
//! "Active" is evaluated in SQL with the same rule as
//! [`BannedUser::is_active_at`]: not lifted, and permanent or ending after
//! `now`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BannedUserRepository, BannedUserRepositoryError};
use crate::domain::{BanId, BanType, BannedUser, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::BannedUserRow;
use super::pool::{DbPool, PoolError};
use super::schema::banned_users;

#[derive(Clone)]
pub struct DieselBannedUserRepository {
    pool: DbPool,
}

impl DieselBannedUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BannedUserRepositoryError {
    map_pool_error(error, BannedUserRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BannedUserRepositoryError {
    map_diesel_error(
        error,
        BannedUserRepositoryError::query,
        BannedUserRepositoryError::connection,
    )
}

fn into_bans(rows: Vec<BannedUserRow>) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
    rows.into_iter()
        .map(BannedUser::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(BannedUserRepositoryError::query)
}

#[async_trait]
impl BannedUserRepository for DieselBannedUserRepository {
    async fn insert(&self, ban: &BannedUser) -> Result<(), BannedUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(banned_users::table)
            .values(BannedUserRow::from(ban))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn find_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = banned_users::table
            .filter(banned_users::lifted_at.is_null())
            .filter(
                banned_users::ban_type
                    .eq(BanType::Permanent.as_str())
                    .or(banned_users::ban_ends_at.gt(now)),
            )
            .select(BannedUserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_bans(rows)
    }

    async fn find_active_for(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = banned_users::table
            .filter(banned_users::user_id.eq(user_id.as_ref()))
            .filter(banned_users::lifted_at.is_null())
            .filter(
                banned_users::ban_type
                    .eq(BanType::Permanent.as_str())
                    .or(banned_users::ban_ends_at.gt(now)),
            )
            .select(BannedUserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_bans(rows)
    }

    async fn history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = banned_users::table
            .filter(banned_users::user_id.eq(user_id.as_ref()))
            .order(banned_users::created_at.asc())
            .select(BannedUserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_bans(rows)
    }

    async fn lift(
        &self,
        ids: &[BanId],
        now: DateTime<Utc>,
    ) -> Result<u64, BannedUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let lifted = diesel::update(banned_users::table.filter(banned_users::id.eq_any(ids)))
            .set((
                banned_users::ban_ends_at.eq(Some(now)),
                banned_users::lifted_at.eq(Some(now)),
                banned_users::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(lifted).unwrap_or(u64::MAX))
    }
}
