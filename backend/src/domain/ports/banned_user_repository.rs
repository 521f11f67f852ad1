//! Port abstraction for ban record persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BanId, BannedUser, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ban record adapters.
    pub enum BannedUserRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "ban store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ban store query failed: {message}",
    }
}

/// Ban records are append-only apart from lifting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BannedUserRepository: Send + Sync {
    /// Store a new record.
    async fn insert(&self, ban: &BannedUser) -> Result<(), BannedUserRepositoryError>;

    /// Records active at `now` across all users.
    async fn find_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError>;

    /// Records for `user_id` active at `now`.
    async fn find_active_for(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError>;

    /// Every record for `user_id`, oldest first.
    async fn history(&self, user_id: &UserId) -> Result<Vec<BannedUser>, BannedUserRepositoryError>;

    /// Stamp `ban_ends_at` and `lifted_at` with `now` on the given records.
    /// Returns the number of records updated.
    async fn lift(
        &self,
        ids: &[BanId],
        now: DateTime<Utc>,
    ) -> Result<u64, BannedUserRepositoryError>;
}
