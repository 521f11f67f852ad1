//! User accounts and hashtag preferences.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    HashtagRepository, HashtagRepositoryError, UpdateUserRequest, UserAccounts,
    UserPersistenceError, UserProfile, UserRepository,
};
use crate::domain::{Error, Hashtag, HashtagId, PreferenceResolver, User, UserId};

/// Public message for lookups of unknown users.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
/// Public message when registering an id that is taken.
pub const USER_EXISTS_MESSAGE: &str = "User with the provided ID already exists";

/// [`UserAccounts`] implementation over the user and hashtag stores.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hashtags: Arc<dyn HashtagRepository>,
    preferences: PreferenceResolver,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hashtags: Arc<dyn HashtagRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let preferences = PreferenceResolver::new(users.clone(), hashtags.clone());
        Self {
            users,
            hashtags,
            preferences,
            clock,
        }
    }

    async fn require_user(&self, user_id: &UserId, public: &'static str) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(|err| map_user_error(err, public))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))
    }

    async fn profile(&self, user: User, public: &'static str) -> Result<UserProfile, Error> {
        let preferences = self
            .preferences
            .hashtags_for(&user)
            .await
            .map_err(|err| map_hashtag_error(err, public))?;
        Ok(UserProfile { user, preferences })
    }

    async fn save(&self, user: &User, public: &'static str) -> Result<(), Error> {
        self.users.update(user).await.map_err(|err| match err {
            UserPersistenceError::Missing { .. } => Error::not_found(USER_NOT_FOUND_MESSAGE),
            other => map_user_error(other, public),
        })
    }
}

fn map_user_error(err: UserPersistenceError, public: &'static str) -> Error {
    error!(error = %err, "user store failure");
    Error::internal(public)
}

fn map_hashtag_error(err: HashtagRepositoryError, public: &'static str) -> Error {
    error!(error = %err, "hashtag store failure while resolving preferences");
    Error::internal(public)
}

#[async_trait]
impl UserAccounts for UserService {
    async fn create_user(&self, user_id: UserId) -> Result<User, Error> {
        let user = User::register(user_id, self.clock.utc());
        self.users.create(&user).await.map_err(|err| match err {
            UserPersistenceError::Duplicate { .. } => Error::conflict(USER_EXISTS_MESSAGE),
            other => map_user_error(other, "Failed to create user"),
        })?;
        info!(user_id = %user.user_id, "user created");
        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        let user = self.require_user(user_id, "Failed to fetch user").await?;
        self.profile(user, "Failed to fetch user").await
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<UserProfile, Error> {
        const PUBLIC: &str = "Failed to update user";
        let mut user = self.require_user(&request.user_id, PUBLIC).await?;
        if let Some(accounts) = &request.accounts {
            user.apply_account_updates(accounts);
        }
        if let Some(token) = request.access_token {
            user.access_token = token;
        }
        user.updated_at = self.clock.utc();
        self.save(&user, PUBLIC).await?;
        self.profile(user, PUBLIC).await
    }

    async fn preferences(&self, user_id: &UserId) -> Result<Vec<Hashtag>, Error> {
        const PUBLIC: &str = "Failed to fetch user preferences";
        let user = self.require_user(user_id, PUBLIC).await?;
        Ok(self.profile(user, PUBLIC).await?.preferences)
    }

    async fn update_preferences(
        &self,
        user_id: &UserId,
        raw_ids: Vec<String>,
    ) -> Result<UserProfile, Error> {
        const PUBLIC: &str = "Failed to update user preferences";
        let mut user = self.require_user(user_id, PUBLIC).await?;

        let parsed: Vec<HashtagId> = raw_ids
            .iter()
            .filter_map(|raw| HashtagId::parse(raw).ok())
            .collect();
        let known = if parsed.is_empty() {
            Vec::new()
        } else {
            self.hashtags
                .find_by_ids(&parsed)
                .await
                .map_err(|err| map_hashtag_error(err, PUBLIC))?
        };
        let mut resolved: Vec<HashtagId> = Vec::with_capacity(parsed.len());
        for id in parsed {
            if known.iter().any(|tag| tag.id == id) && !resolved.contains(&id) {
                resolved.push(id);
            }
        }

        user.preferences = resolved;
        user.updated_at = self.clock.utc();
        self.save(&user, PUBLIC).await?;
        self.profile(user, PUBLIC).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
