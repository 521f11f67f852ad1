//! Ban records and the "currently banned" predicate.
//!
//! Bans are never deleted. Lifting stamps `ban_ends_at` and `lifted_at` with
//! the current instant so history stays queryable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Ban record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BanId(Uuid);

impl BanId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How long a ban lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanType {
    /// Active until `ban_ends_at`.
    Temporary,
    /// Active until lifted.
    Permanent,
}

impl BanType {
    /// Stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temporary => "temporary",
            Self::Permanent => "permanent",
        }
    }
}

/// Raised for an unknown ban type label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ban type must be either temporary or permanent")]
pub struct BanTypeParseError;

impl FromStr for BanType {
    type Err = BanTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temporary" => Ok(Self::Temporary),
            "permanent" => Ok(Self::Permanent),
            _ => Err(BanTypeParseError),
        }
    }
}

/// One ban issued against a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannedUser {
    pub id: BanId,
    pub user_id: UserId,
    pub reason: String,
    pub banned_by: UserId,
    pub ban_type: BanType,
    pub ban_ends_at: Option<DateTime<Utc>>,
    /// Set when an admin lifts the ban.
    pub lifted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BannedUser {
    /// Whether this record bans its user at `now`.
    ///
    /// Permanent bans hold until lifted. Temporary bans hold while
    /// `ban_ends_at` is in the future; a temporary record without an end
    /// instant does not ban.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use reelfeed::domain::{BanId, BanType, BannedUser, UserId};
    ///
    /// let now = Utc::now();
    /// let ban = BannedUser {
    ///     id: BanId::generate(),
    ///     user_id: UserId::new("U1").expect("id"),
    ///     reason: "spam".into(),
    ///     banned_by: UserId::new("ADMIN1").expect("id"),
    ///     ban_type: BanType::Temporary,
    ///     ban_ends_at: Some(now + Duration::hours(1)),
    ///     lifted_at: None,
    ///     created_at: now,
    ///     updated_at: now,
    /// };
    /// assert!(ban.is_active_at(now));
    /// assert!(!ban.is_active_at(now + Duration::hours(2)));
    /// ```
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.lifted_at.is_some() {
            return false;
        }
        match self.ban_type {
            BanType::Permanent => true,
            BanType::Temporary => self.ban_ends_at.is_some_and(|ends| ends > now),
        }
    }

    /// Mark the ban as lifted at `now`.
    pub fn lift(&mut self, now: DateTime<Utc>) {
        self.ban_ends_at = Some(now);
        self.lifted_at = Some(now);
        self.updated_at = now;
    }
}
