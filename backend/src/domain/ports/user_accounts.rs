//! Driving port for user accounts and hashtag preferences.

use async_trait::async_trait;

use crate::domain::{AccountUpdate, Error, Hashtag, User, UserId};

/// A user with preferences resolved to hashtags, in preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    pub preferences: Vec<Hashtag>,
}

/// Partial update of a user's linked accounts and token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub user_id: UserId,
    /// Account names are unique within the list.
    pub accounts: Option<Vec<AccountUpdate>>,
    /// `Some(None)` clears the token.
    pub access_token: Option<Option<String>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a user with default accounts and roles.
    ///
    /// # Errors
    ///
    /// `conflict` when the id is taken.
    async fn create_user(&self, user_id: UserId) -> Result<User, Error>;

    /// Fetch a user with resolved preferences, or `not_found`.
    async fn get_user(&self, user_id: &UserId) -> Result<UserProfile, Error>;

    /// Merge account and token changes, or `not_found`.
    async fn update_user(&self, request: UpdateUserRequest) -> Result<UserProfile, Error>;

    /// The user's preferred hashtags, or `not_found`.
    async fn preferences(&self, user_id: &UserId) -> Result<Vec<Hashtag>, Error>;

    /// Replace preferences. Ids that are malformed or do not name a stored
    /// hashtag are dropped; order is preserved.
    async fn update_preferences(
        &self,
        user_id: &UserId,
        raw_ids: Vec<String>,
    ) -> Result<UserProfile, Error>;
}
