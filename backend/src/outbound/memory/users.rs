//! In-memory user store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::lock;

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(
                users
                    .into_iter()
                    .map(|user| (user.user_id.clone(), user))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users, UserPersistenceError::query)?;
        if users.contains_key(&user.user_id) {
            return Err(UserPersistenceError::duplicate(user.user_id.to_string()));
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users, UserPersistenceError::query)?;
        match users.get_mut(&user.user_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::missing(user.user_id.to_string())),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users.get(id).cloned())
    }
}
