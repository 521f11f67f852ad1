//! In-memory post store.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::feed::{FeedSort, PostsQuery, PostsSelection};
use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{HashtagCount, Post, PostId};

use super::lock;

/// Post store evaluating [`PostsQuery`] clauses directly.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: Mutex<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `posts`.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
        }
    }

    /// Copy of every stored post, in insertion order.
    ///
    /// # Errors
    ///
    /// Fails only when the lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<Post>, PostRepositoryError> {
        Ok(lock(&self.posts, PostRepositoryError::query)?.clone())
    }
}

fn sort_posts(posts: &mut [&Post], sort: FeedSort) {
    match sort {
        FeedSort::Latest => posts.sort_by_key(|post| Reverse(post.created_at)),
        FeedSort::MostLiked => posts.sort_by_key(|post| Reverse(post.like_count)),
        FeedSort::MostCommented => posts.sort_by_key(|post| Reverse(post.comment_count)),
    }
}

#[async_trait]
impl PostRepository for MemoryPostStore {
    async fn find(
        &self,
        query: &PostsQuery,
        selection: PostsSelection,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        let mut matching: Vec<&Post> = posts.iter().filter(|post| query.matches(post)).collect();
        sort_posts(&mut matching, selection.sort);
        let skip = usize::try_from(selection.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(selection.limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &PostsQuery) -> Result<u64, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        let matching = posts.iter().filter(|post| query.matches(post)).count();
        Ok(u64::try_from(matching).unwrap_or(u64::MAX))
    }

    async fn count_all(&self) -> Result<u64, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        Ok(u64::try_from(posts.len()).unwrap_or(u64::MAX))
    }

    async fn exists_by_hash(&self, post_hash: &str) -> Result<bool, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        Ok(posts.iter().any(|post| post.post_hash == post_hash))
    }

    async fn insert_if_absent(&self, post: &Post) -> Result<bool, PostRepositoryError> {
        let mut posts = lock(&self.posts, PostRepositoryError::query)?;
        if posts.iter().any(|stored| stored.post_hash == post.post_hash) {
            return Ok(false);
        }
        posts.push(post.clone());
        Ok(true)
    }

    async fn delete_oldest(&self, count: u64) -> Result<u64, PostRepositoryError> {
        let mut posts = lock(&self.posts, PostRepositoryError::query)?;
        let mut by_age: Vec<(chrono::DateTime<chrono::Utc>, PostId)> =
            posts.iter().map(|post| (post.created_at, post.id)).collect();
        by_age.sort();
        let take = usize::try_from(count).unwrap_or(usize::MAX);
        let doomed: Vec<PostId> = by_age.into_iter().take(take).map(|(_, id)| id).collect();
        posts.retain(|post| !doomed.contains(&post.id));
        Ok(u64::try_from(doomed.len()).unwrap_or(u64::MAX))
    }

    async fn find_by_ids(&self, ids: &[PostId]) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        Ok(posts
            .iter()
            .filter(|post| ids.contains(&post.id))
            .cloned()
            .collect())
    }

    async fn hashtag_counts(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<HashtagCount>, PostRepositoryError> {
        let posts = lock(&self.posts, PostRepositoryError::query)?;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for tag in posts.iter().flat_map(|post| post.hashtags.iter()) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
        let mut ranked: Vec<HashtagCount> = counts
            .into_iter()
            .map(|(hashtag, count)| HashtagCount {
                hashtag: hashtag.to_owned(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hashtag.cmp(&b.hashtag)));
        if let Some(limit) = limit {
            ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(ranked)
    }
}
