//! Hashtag listings and the post-to-hashtag backfill.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    HashtagCatalogue, HashtagRepository, HashtagRepositoryError, PostRepository,
    PostRepositoryError,
};
use crate::domain::{Error, Hashtag, HashtagCount, explicit_words, normalize_tag};

/// Size of the top-hashtags listing.
pub const TOP_HASHTAGS_LIMIT: u32 = 20;

#[derive(Clone)]
pub struct HashtagService {
    posts: Arc<dyn PostRepository>,
    hashtags: Arc<dyn HashtagRepository>,
    clock: Arc<dyn Clock>,
}

impl HashtagService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        hashtags: Arc<dyn HashtagRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            hashtags,
            clock,
        }
    }
}

fn map_post_error(err: PostRepositoryError, public: &'static str) -> Error {
    error!(error = %err, "post store failure while counting hashtags");
    Error::internal(public)
}

fn map_hashtag_error(err: HashtagRepositoryError, public: &'static str) -> Error {
    error!(error = %err, "hashtag store failure");
    Error::internal(public)
}

#[async_trait]
impl HashtagCatalogue for HashtagService {
    async fn top_hashtags(&self) -> Result<Vec<HashtagCount>, Error> {
        self.posts
            .hashtag_counts(Some(TOP_HASHTAGS_LIMIT))
            .await
            .map_err(|err| map_post_error(err, "Failed to get top hashtags"))
    }

    async fn hashtags_by_usage(&self, limit: u32) -> Result<Vec<Hashtag>, Error> {
        let excluded: Vec<String> = explicit_words()
            .iter()
            .map(|word| (*word).to_owned())
            .collect();
        self.hashtags
            .list_by_usage(&excluded, limit)
            .await
            .map_err(|err| map_hashtag_error(err, "Failed to get hashtags"))
    }

    async fn migrate_hashtags(&self) -> Result<u64, Error> {
        const PUBLIC: &str = "Failed to migrate hashtags";
        let counts = self
            .posts
            .hashtag_counts(None)
            .await
            .map_err(|err| map_post_error(err, PUBLIC))?;

        let mut merged: BTreeMap<String, i64> = BTreeMap::new();
        for entry in counts {
            if let Some(name) = normalize_tag(&entry.hashtag) {
                *merged.entry(name).or_default() += entry.count;
            }
        }

        let now = self.clock.utc();
        let mut touched = 0;
        for (name, count) in &merged {
            self.hashtags
                .increment(name, *count, now)
                .await
                .map_err(|err| map_hashtag_error(err, PUBLIC))?;
            touched += 1;
        }
        info!(touched, "hashtags migrated");
        Ok(touched)
    }
}
