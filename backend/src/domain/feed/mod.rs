//! Feed composition: filter builder, two-pass executor, cache policy and the
//! service tying them to the stores.

mod cache_policy;
mod executor;
mod filter;
mod service;

use serde::{Deserialize, Serialize};

use crate::domain::Post;

pub use cache_policy::{feed_cache_key, revalidate_cached};
pub use executor::{FeedPlan, execute_feed};
pub use filter::{FeedSort, PostsFilter, PostsQuery, PostsSelection, tokenize};
pub use service::{FAILED_TO_GET_POSTS, FeedService, SUGGESTION_LIMIT};

/// One page of the feed, as returned to clients and stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    /// Matching posts across all pages.
    pub total_posts: u64,
    /// `ceil(total_posts / limit)`.
    pub total_pages: u64,
    /// Echo of the requested page.
    pub current_page: u32,
    pub posts: Vec<Post>,
}
