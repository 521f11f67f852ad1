//! Banned-user registry service.
//!
//! Admin validation resolves both users and requires the `admin` role on the
//! moderator. Authorisation failures use `unprocessable_entity` for both
//! creating and lifting bans.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    BanRegistry, BannedUserRepository, BannedUserRepositoryError, CreateBanRequest,
    LiftBanRequest, UserPersistenceError, UserRepository,
};
use crate::domain::{BanId, BanType, BannedUser, Error, UserId};

/// Public message for self-ban attempts.
pub const SELF_BAN_MESSAGE: &str = "user can not ban themself";
/// Public message when either party does not exist.
pub const INVALID_USERS_MESSAGE: &str = "user ids invalid";
/// Public message when the moderator lacks the admin role.
pub const UNAUTHORISED_MESSAGE: &str = "unauthorised";
/// Public message for lifting a ban that is not active.
pub const NOT_BANNED_MESSAGE: &str = "user is not banned";
/// Public message for a temporary ban without a future end.
pub const BAN_END_MESSAGE: &str = "banEndsAt must be a valid future date for temporary bans";

/// Ban registry backed by a [`BannedUserRepository`].
#[derive(Clone)]
pub struct BanService {
    bans: Arc<dyn BannedUserRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl BanService {
    /// Build the service; `clock` decides whether temporary bans have ended.
    pub fn new(
        bans: Arc<dyn BannedUserRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { bans, users, clock }
    }

    async fn ensure_admin(&self, user_id: &UserId, banned_by: &UserId) -> Result<(), Error> {
        let target = self.users.find_by_id(user_id).await.map_err(map_user_error)?;
        let moderator = self
            .users
            .find_by_id(banned_by)
            .await
            .map_err(map_user_error)?;
        match (target, moderator) {
            (Some(_), Some(moderator)) if moderator.is_admin() => Ok(()),
            (Some(_), Some(_)) => Err(Error::unprocessable(UNAUTHORISED_MESSAGE)),
            _ => Err(Error::unprocessable(INVALID_USERS_MESSAGE)),
        }
    }
}

fn map_ban_error(err: BannedUserRepositoryError) -> Error {
    error!(error = %err, "ban store failure");
    Error::internal("Failed to process ban")
}

fn map_user_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store failure during ban validation");
    Error::internal("Failed to process ban")
}

#[async_trait]
impl BanRegistry for BanService {
    async fn create_ban(&self, request: CreateBanRequest) -> Result<BannedUser, Error> {
        if request.user_id == request.banned_by {
            return Err(Error::invalid_request(SELF_BAN_MESSAGE));
        }
        self.ensure_admin(&request.user_id, &request.banned_by).await?;

        let now = self.clock.utc();
        if request.ban_type == BanType::Temporary
            && !request.ban_ends_at.is_some_and(|ends| ends > now)
        {
            return Err(Error::invalid_request(BAN_END_MESSAGE));
        }

        let ban = BannedUser {
            id: BanId::generate(),
            user_id: request.user_id,
            reason: request.reason,
            banned_by: request.banned_by,
            ban_type: request.ban_type,
            ban_ends_at: request.ban_ends_at,
            lifted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.bans.insert(&ban).await.map_err(map_ban_error)?;
        info!(
            user_id = %ban.user_id,
            banned_by = %ban.banned_by,
            ban_type = ban.ban_type.as_str(),
            "user banned"
        );
        Ok(ban)
    }

    async fn lift_ban(&self, request: LiftBanRequest) -> Result<(), Error> {
        let now = self.clock.utc();
        let active = self
            .bans
            .find_active_for(&request.user_id, now)
            .await
            .map_err(map_ban_error)?;
        if active.is_empty() {
            return Err(Error::invalid_request(NOT_BANNED_MESSAGE));
        }
        self.ensure_admin(&request.user_id, &request.banned_by).await?;

        let ids: Vec<BanId> = active.iter().map(|ban| ban.id).collect();
        let lifted = self.bans.lift(&ids, now).await.map_err(map_ban_error)?;
        info!(user_id = %request.user_id, lifted, "ban lifted");
        Ok(())
    }

    async fn is_banned(&self, user_id: &UserId) -> Result<bool, Error> {
        let active = self
            .bans
            .find_active_for(user_id, self.clock.utc())
            .await
            .map_err(map_ban_error)?;
        Ok(!active.is_empty())
    }

    async fn ban_history(&self, user_id: &UserId) -> Result<Vec<BannedUser>, Error> {
        self.bans.history(user_id).await.map_err(map_ban_error)
    }

    async fn currently_banned_user_ids(&self) -> Result<Vec<String>, Error> {
        let active = self
            .bans
            .find_active(self.clock.utc())
            .await
            .map_err(map_ban_error)?;
        let ids: BTreeSet<String> = active
            .into_iter()
            .map(|ban| String::from(ban.user_id))
            .collect();
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "ban_service_tests.rs"]
mod tests;
