//! Feed service implementing the [`FeedQuery`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{BanRegistry, FeedCache, FeedQuery, FeedRequest, PostRepository};
use crate::domain::{Error, Post, PreferenceResolver, explicit_hashtags};

use super::{
    FeedPage, FeedPlan, FeedSort, PostsFilter, PostsSelection, execute_feed, feed_cache_key,
    revalidate_cached, tokenize,
};

/// Public message for any feed read failure.
pub const FAILED_TO_GET_POSTS: &str = "Failed to get posts";

/// Maximum number of posts returned by [`FeedQuery::suggestions`].
pub const SUGGESTION_LIMIT: u32 = 5;

/// Composes feed pages from the post store, ban registry and cache.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn FeedCache>,
    bans: Arc<dyn BanRegistry>,
    preferences: PreferenceResolver,
}

impl FeedService {
    /// Wire the service to its stores; `preferences` ranks a user's tags.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        cache: Arc<dyn FeedCache>,
        bans: Arc<dyn BanRegistry>,
        preferences: PreferenceResolver,
    ) -> Self {
        Self {
            posts,
            cache,
            bans,
            preferences,
        }
    }

    async fn banned_ids(&self) -> Result<Vec<String>, Error> {
        self.bans.currently_banned_user_ids().await.map_err(|err| {
            error!(error = %err, "failed to load banned users for feed");
            Error::internal(FAILED_TO_GET_POSTS)
        })
    }

    async fn cached_page(&self, key: &str, banned: &[String], limit: u32) -> Option<FeedPage> {
        match self.cache.get(key).await {
            Ok(Some(page)) => {
                let fresh = revalidate_cached(page, banned, limit);
                if fresh.is_none() {
                    debug!(key, "cached feed page too stale after ban filtering");
                }
                fresh
            }
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "feed cache read failed");
                None
            }
        }
    }

    async fn store_page(&self, key: &str, page: &FeedPage) {
        if let Err(err) = self.cache.set(key, page).await {
            warn!(key, error = %err, "feed cache write failed");
        }
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn feed(&self, request: FeedRequest) -> Result<FeedPage, Error> {
        let singular = request.singular_tag().map(str::to_owned);
        let mut filter = PostsFilter::new().with_moment(request.moment.as_deref());
        if let Some(tag) = &singular {
            filter = filter.with_hashtags(vec![format!("#{tag}")]);
        }
        let filter = filter.with_excluded_hashtags(explicit_hashtags());
        let moment = request.moment.as_deref() == Some("true");

        let banned = self.banned_ids().await?;
        let key = feed_cache_key(request.page, request.limit, moment, singular.as_deref());
        if let Some(page) = self.cached_page(&key, &banned, request.limit).await {
            return Ok(page);
        }

        let mut filter = filter.with_banned_user_ids(banned);
        if let Some(text) = request.related_of.as_deref() {
            filter = filter.with_related_search(text);
        }

        let preferences = match (&singular, request.user_id.as_deref()) {
            (None, Some(user_id)) => {
                self.preferences
                    .preferred_tags(user_id)
                    .await
                    .map_err(|err| {
                        error!(error = %err, "failed to resolve feed preferences");
                        Error::internal(FAILED_TO_GET_POSTS)
                    })?
            }
            _ => Vec::new(),
        };

        let plan = FeedPlan {
            page: request.page,
            limit: request.limit,
            sort: request.sort,
            singular_tag: singular.is_some(),
            has_user: request.user_id.is_some(),
            preferences,
        };
        let page = execute_feed(self.posts.as_ref(), filter, &plan)
            .await
            .map_err(|err| {
                error!(error = %err, "feed query failed");
                Error::internal(FAILED_TO_GET_POSTS)
            })?;

        self.store_page(&key, &page).await;
        Ok(page)
    }

    async fn suggestions(&self, title: &str) -> Result<Vec<Post>, Error> {
        if tokenize(title).is_empty() {
            return Ok(Vec::new());
        }
        let banned = self.banned_ids().await?;
        let query = PostsFilter::new()
            .with_related_search(title)
            .with_banned_user_ids(banned)
            .with_excluded_hashtags(explicit_hashtags())
            .strip_empty();
        let selection = PostsSelection {
            skip: 0,
            limit: SUGGESTION_LIMIT,
            sort: FeedSort::Latest,
        };
        self.posts.find(&query, selection).await.map_err(|err| {
            error!(error = %err, "suggestion query failed");
            Error::internal(FAILED_TO_GET_POSTS)
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
