//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, UserPersistenceError::query, UserPersistenceError::connection)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        let row = UserRow::from_user(user).map_err(UserPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate(user.user_id.to_string())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let row = UserRow::from_user(user).map_err(UserPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(users::table.find(user.user_id.as_ref()))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::missing(user.user_id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(UserRow::into_user)
            .transpose()
            .map_err(UserPersistenceError::query)
    }
}
