//! Redis-backed feed cache.
//!
//! Keys are namespaced as `feed:v1:<sha256>` over the logical cache key so a
//! payload format change can bump the version without flushing Redis. Each
//! write gets the configured TTL plus up to 10% random jitter so entries
//! written together do not expire together.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::{RedisConnectionManager, bb8, redis};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::feed::FeedPage;
use crate::domain::ports::{FeedCache, FeedCacheError};

const KEY_NAMESPACE: &str = "feed:v1:";

/// Namespaced Redis key for a logical feed cache key.
#[must_use]
pub fn namespaced_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{KEY_NAMESPACE}{}", hex::encode(digest))
}

/// TTL in seconds with jitter drawn from `[0, ttl / 10]`.
fn jittered_ttl(ttl: Duration, rng: &mut impl Rng) -> u64 {
    let base = ttl.as_secs().max(1);
    base + rng.gen_range(0..=base / 10)
}

#[derive(Clone)]
pub struct RedisFeedCache {
    pool: bb8::Pool<RedisConnectionManager>,
    ttl: Duration,
}

impl RedisFeedCache {
    /// Connect a pool to `redis_url`.
    ///
    /// # Errors
    ///
    /// [`FeedCacheError::Backend`] when the URL is invalid or Redis is
    /// unreachable.
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, FeedCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| FeedCacheError::backend(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|err| FeedCacheError::backend(err.to_string()))?;
        Ok(Self { pool, ttl })
    }
}

#[async_trait]
impl FeedCache for RedisFeedCache {
    async fn get(&self, key: &str) -> Result<Option<FeedPage>, FeedCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| FeedCacheError::backend(err.to_string()))?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(namespaced_key(key))
            .query_async(&mut *conn)
            .await
            .map_err(|err| FeedCacheError::backend(err.to_string()))?;
        payload
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|err| FeedCacheError::serialization(err.to_string()))
    }

    async fn set(&self, key: &str, page: &FeedPage) -> Result<(), FeedCacheError> {
        let payload = serde_json::to_string(page)
            .map_err(|err| FeedCacheError::serialization(err.to_string()))?;
        let ttl = jittered_ttl(self.ttl, &mut rand::thread_rng());
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| FeedCacheError::backend(err.to_string()))?;
        redis::cmd("SET")
            .arg(namespaced_key(key))
            .arg(payload)
            .arg("EX")
            .arg(ttl)
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| FeedCacheError::backend(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    fn keys_are_namespaced_digests() {
        let key = namespaced_key("postsData-page1-limit10-momentfalse");
        assert!(key.starts_with(KEY_NAMESPACE));
        assert_eq!(key.len(), KEY_NAMESPACE.len() + 64);
        assert_eq!(key, namespaced_key("postsData-page1-limit10-momentfalse"));
        assert_ne!(key, namespaced_key("postsData-page2-limit10-momentfalse"));
    }

    #[rstest]
    fn ttl_jitter_stays_within_ten_percent() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let ttl = jittered_ttl(Duration::from_secs(600), &mut rng);
            assert!((600..=660).contains(&ttl));
        }
    }
}
