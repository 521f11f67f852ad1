//! Driving port for the banned-user registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BanType, BannedUser, Error, UserId};

/// Validated input for issuing a ban.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBanRequest {
    pub user_id: UserId,
    pub banned_by: UserId,
    pub ban_type: BanType,
    /// Required and in the future for temporary bans.
    pub ban_ends_at: Option<DateTime<Utc>>,
    pub reason: String,
}

/// Input for lifting a user's active bans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftBanRequest {
    pub user_id: UserId,
    pub banned_by: UserId,
}

/// Moderation operations on users.
///
/// "Currently banned" is always evaluated against the clock at call time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BanRegistry: Send + Sync {
    /// Issue a ban.
    ///
    /// # Errors
    ///
    /// - `invalid_request` for self-bans and temporary bans without a future
    ///   end instant.
    /// - `unprocessable_entity` when either user is unknown or `banned_by`
    ///   is not an admin.
    async fn create_ban(&self, request: CreateBanRequest) -> Result<BannedUser, Error>;

    /// Lift every active ban on a user.
    ///
    /// # Errors
    ///
    /// - `invalid_request` with `user is not banned` when nothing is active.
    /// - `unprocessable_entity` for the same admin checks as creation.
    async fn lift_ban(&self, request: LiftBanRequest) -> Result<(), Error>;

    /// Whether the user has an active ban.
    async fn is_banned(&self, user_id: &UserId) -> Result<bool, Error>;

    /// Every record for the user, oldest first.
    async fn ban_history(&self, user_id: &UserId) -> Result<Vec<BannedUser>, Error>;

    /// Ids of every currently banned user, without duplicates.
    async fn currently_banned_user_ids(&self) -> Result<Vec<String>, Error>;
}
