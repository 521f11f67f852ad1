//! In-memory ban record store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{BannedUserRepository, BannedUserRepositoryError};
use crate::domain::{BanId, BannedUser, UserId};

use super::lock;

#[derive(Debug, Default)]
pub struct MemoryBanStore {
    bans: Mutex<Vec<BannedUser>>,
}

impl MemoryBanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BannedUserRepository for MemoryBanStore {
    async fn insert(&self, ban: &BannedUser) -> Result<(), BannedUserRepositoryError> {
        lock(&self.bans, BannedUserRepositoryError::query)?.push(ban.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let bans = lock(&self.bans, BannedUserRepositoryError::query)?;
        Ok(bans
            .iter()
            .filter(|ban| ban.is_active_at(now))
            .cloned()
            .collect())
    }

    async fn find_active_for(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let bans = lock(&self.bans, BannedUserRepositoryError::query)?;
        Ok(bans
            .iter()
            .filter(|ban| ban.user_id == *user_id && ban.is_active_at(now))
            .cloned()
            .collect())
    }

    async fn history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BannedUser>, BannedUserRepositoryError> {
        let bans = lock(&self.bans, BannedUserRepositoryError::query)?;
        let mut history: Vec<BannedUser> = bans
            .iter()
            .filter(|ban| ban.user_id == *user_id)
            .cloned()
            .collect();
        history.sort_by_key(|ban| ban.created_at);
        Ok(history)
    }

    async fn lift(
        &self,
        ids: &[BanId],
        now: DateTime<Utc>,
    ) -> Result<u64, BannedUserRepositoryError> {
        let mut bans = lock(&self.bans, BannedUserRepositoryError::query)?;
        let mut lifted = 0;
        for ban in bans.iter_mut().filter(|ban| ids.contains(&ban.id)) {
            ban.lift(now);
            lifted += 1;
        }
        Ok(lifted)
    }
}
