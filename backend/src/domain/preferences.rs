//! Resolves a user's stored hashtag preferences.

use std::sync::Arc;

use crate::domain::ports::{
    HashtagRepository, HashtagRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{Hashtag, User, UserId};

/// Failure while dereferencing preferences.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error(transparent)]
    Users(#[from] UserPersistenceError),
    #[error(transparent)]
    Hashtags(#[from] HashtagRepositoryError),
}

/// Maps users to their ordered hashtag preferences.
#[derive(Clone)]
pub struct PreferenceResolver {
    users: Arc<dyn UserRepository>,
    hashtags: Arc<dyn HashtagRepository>,
}

impl PreferenceResolver {
    pub fn new(users: Arc<dyn UserRepository>, hashtags: Arc<dyn HashtagRepository>) -> Self {
        Self { users, hashtags }
    }

    /// Dereference `user.preferences`, keeping preference order and
    /// skipping ids whose hashtag no longer exists.
    ///
    /// # Errors
    ///
    /// Propagates hashtag store failures.
    pub async fn hashtags_for(&self, user: &User) -> Result<Vec<Hashtag>, HashtagRepositoryError> {
        if user.preferences.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.hashtags.find_by_ids(&user.preferences).await?;
        Ok(user
            .preferences
            .iter()
            .filter_map(|id| found.iter().find(|tag| tag.id == *id).cloned())
            .collect())
    }

    /// `#`-prefixed preferred tags for a raw user id.
    ///
    /// Malformed ids and unknown users yield an empty list, meaning "no
    /// bias".
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn preferred_tags(&self, raw_user_id: &str) -> Result<Vec<String>, PreferenceError> {
        let Ok(user_id) = UserId::new(raw_user_id) else {
            return Ok(Vec::new());
        };
        let Some(user) = self.users.find_by_id(&user_id).await? else {
            return Ok(Vec::new());
        };
        let tags = self.hashtags_for(&user).await?;
        Ok(tags.iter().map(Hashtag::as_post_tag).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HashtagId;
    use crate::domain::ports::{MockHashtagRepository, MockUserRepository};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn hashtag(name: &str) -> Hashtag {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        Hashtag {
            id: HashtagId::generate(),
            name: name.to_owned(),
            post_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_means_no_bias() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let resolver =
            PreferenceResolver::new(Arc::new(users), Arc::new(MockHashtagRepository::new()));

        assert_eq!(resolver.preferred_tags("U9").await, Ok(Vec::new()));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_user_id_means_no_bias() {
        let resolver = PreferenceResolver::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockHashtagRepository::new()),
        );

        assert_eq!(resolver.preferred_tags("has space").await, Ok(Vec::new()));
    }

    #[rstest]
    #[tokio::test]
    async fn preferences_keep_stored_order() {
        let (cats, dogs) = (hashtag("cats"), hashtag("dogs"));
        let mut user = User::register(UserId::new("U1").expect("id"), cats.created_at);
        user.preferences = vec![dogs.id, HashtagId::generate(), cats.id];

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let mut hashtags = MockHashtagRepository::new();
        let stored = vec![cats, dogs];
        hashtags
            .expect_find_by_ids()
            .returning(move |_| Ok(stored.clone()));
        let resolver = PreferenceResolver::new(Arc::new(users), Arc::new(hashtags));

        assert_eq!(
            resolver.preferred_tags("U1").await,
            Ok(vec!["#dogs".to_owned(), "#cats".to_owned()])
        );
    }
}
