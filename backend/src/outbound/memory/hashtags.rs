//! In-memory hashtag store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{HashtagRepository, HashtagRepositoryError};
use crate::domain::{Hashtag, HashtagId};

use super::lock;

#[derive(Debug, Default)]
pub struct MemoryHashtagStore {
    hashtags: Mutex<Vec<Hashtag>>,
}

impl MemoryHashtagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `hashtags`.
    pub fn with_hashtags(hashtags: Vec<Hashtag>) -> Self {
        Self {
            hashtags: Mutex::new(hashtags),
        }
    }
}

#[async_trait]
impl HashtagRepository for MemoryHashtagStore {
    async fn find_by_ids(&self, ids: &[HashtagId]) -> Result<Vec<Hashtag>, HashtagRepositoryError> {
        let hashtags = lock(&self.hashtags, HashtagRepositoryError::query)?;
        Ok(hashtags
            .iter()
            .filter(|tag| ids.contains(&tag.id))
            .cloned()
            .collect())
    }

    async fn list_by_usage(
        &self,
        excluded: &[String],
        limit: u32,
    ) -> Result<Vec<Hashtag>, HashtagRepositoryError> {
        let hashtags = lock(&self.hashtags, HashtagRepositoryError::query)?;
        let mut listed: Vec<Hashtag> = hashtags
            .iter()
            .filter(|tag| !excluded.iter().any(|name| name.eq_ignore_ascii_case(&tag.name)))
            .cloned()
            .collect();
        listed.sort_by_key(|tag| tag.post_count);
        listed.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(listed)
    }

    async fn increment(
        &self,
        name: &str,
        count: i64,
        now: DateTime<Utc>,
    ) -> Result<Hashtag, HashtagRepositoryError> {
        let mut hashtags = lock(&self.hashtags, HashtagRepositoryError::query)?;
        if let Some(existing) = hashtags.iter_mut().find(|tag| tag.name == name) {
            existing.post_count += count;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let created = Hashtag {
            id: HashtagId::generate(),
            name: name.to_owned(),
            post_count: count,
            created_at: now,
            updated_at: now,
        };
        hashtags.push(created.clone());
        Ok(created)
    }
}
