//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// A user with this id already exists.
        Duplicate { user_id: String } => "user {user_id} already exists",
        /// The user to update does not exist.
        Missing { user_id: String } => "user {user_id} does not exist",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `Duplicate` on an existing id.
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace a stored user, failing with `Missing` when absent.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
