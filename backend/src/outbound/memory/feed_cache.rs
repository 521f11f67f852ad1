//! In-memory feed cache with a fixed TTL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::feed::FeedPage;
use crate::domain::ports::{FeedCache, FeedCacheError};

use super::lock;

/// Process-local cache. Entries expire `ttl` after their last write.
#[derive(Debug)]
pub struct MemoryFeedCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, FeedPage)>>,
}

impl MemoryFeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }
}

#[async_trait]
impl FeedCache for MemoryFeedCache {
    async fn get(&self, key: &str) -> Result<Option<FeedPage>, FeedCacheError> {
        let mut entries = lock(&self.entries, FeedCacheError::backend)?;
        let expired = match entries.get(key) {
            Some((written, page)) if written.elapsed() < self.ttl => return Ok(Some(page.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, page: &FeedPage) -> Result<(), FeedCacheError> {
        let mut entries = lock(&self.entries, FeedCacheError::backend)?;
        entries.retain(|_, (written, _)| written.elapsed() < self.ttl);
        entries.insert(key.to_owned(), (Instant::now(), page.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page() -> FeedPage {
        FeedPage {
            total_posts: 0,
            total_pages: 0,
            current_page: 1,
            posts: Vec::new(),
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryFeedCache::new(Duration::from_secs(600));
        cache.set("k", &page()).await.expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some(page()));

        tokio::time::advance(Duration::from_secs(601)).await;

        assert_eq!(cache.get("k").await.expect("get"), None);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn writes_evict_expired_keys() {
        let cache = MemoryFeedCache::new(Duration::from_secs(600));
        for page_number in 1..=50 {
            cache
                .set(&format!("postsData-page{page_number}"), &page())
                .await
                .expect("set");
        }
        assert_eq!(cache.len(), 50);

        tokio::time::advance(Duration::from_secs(601)).await;
        cache.set("fresh", &page()).await.expect("set");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh").await.expect("get"), Some(page()));
    }

    #[rstest]
    #[tokio::test]
    async fn set_overwrites() {
        let cache = MemoryFeedCache::new(Duration::from_secs(60));
        cache.set("k", &page()).await.expect("set");
        let mut newer = page();
        newer.current_page = 2;
        cache.set("k", &newer).await.expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some(newer));
    }
}
