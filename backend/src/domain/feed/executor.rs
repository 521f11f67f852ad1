//! Two-pass feed execution.
//!
//! Pass 1 reads the requested page with the preference bias applied. When it
//! under-fills the page and no single hashtag was requested, pass 2 reads
//! from the unbiased filter with pass-1 ids excluded, and the fill results
//! replace the pass-1 results on the page.
//!
//! | singular tag | user | pass-1 short | outcome                               |
//! |--------------|------|--------------|---------------------------------------|
//! | yes          | any  | any          | pass 1 only, total = pass-1 count     |
//! | no           | yes  | no           | pass 1 only, total = pass-1 count     |
//! | no           | yes  | yes          | fill only, total = pass-1 count       |
//! | no           | no   | yes          | fill only, total = both counts        |

use pagination::{calc_skip, total_pages};

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Post, PostId, contains_explicit_word, is_explicit_tag};

use super::{FeedPage, FeedSort, PostsFilter, PostsSelection};

/// Request-derived parameters for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPlan {
    /// One-based page number.
    pub page: u32,
    /// Page size; zero is treated as one.
    pub limit: u32,
    /// Ordering applied to both passes.
    pub sort: FeedSort,
    /// A single hashtag was requested.
    pub singular_tag: bool,
    /// A user id accompanied the request.
    pub has_user: bool,
    /// `#`-prefixed preferred hashtags, strongest first.
    pub preferences: Vec<String>,
}

/// Run both passes against `store`.
///
/// `filter` carries every request-level clause (moment, singular hashtag,
/// explicit and banned exclusions, related search). Preferences from `plan`
/// are applied here so they can be removed for the fill pass.
///
/// # Errors
///
/// Propagates store failures unchanged.
pub async fn execute_feed(
    store: &dyn PostRepository,
    filter: PostsFilter,
    plan: &FeedPlan,
) -> Result<FeedPage, PostRepositoryError> {
    let limit = plan.limit.max(1);
    let preferred = if plan.singular_tag {
        filter
    } else {
        filter.with_hashtags(plan.preferences.clone())
    };

    let first_query = preferred.clone().strip_empty();
    let first_selection = PostsSelection {
        skip: calc_skip(plan.page, limit),
        limit,
        sort: plan.sort,
    };
    let first = drop_explicit(store.find(&first_query, first_selection).await?);
    let posts_count = store.count(&first_query).await?;

    let fetched: Vec<PostId> = first.iter().map(|post| post.id).collect();
    let fallback_query = preferred
        .without_hashtag_bias()
        .with_excluded_ids(fetched)
        .strip_empty();

    let mut total_posts = posts_count;
    if !plan.singular_tag && !plan.has_user {
        total_posts += store.count(&fallback_query).await?;
    }

    let returned = u32::try_from(first.len()).unwrap_or(u32::MAX);
    let remaining = limit.saturating_sub(returned);
    let posts = if remaining > 0 && !plan.singular_tag {
        let fill_page = u32::try_from(posts_count / u64::from(limit)).unwrap_or(u32::MAX);
        let fill_selection = PostsSelection {
            skip: calc_skip(fill_page, remaining),
            limit: remaining,
            sort: plan.sort,
        };
        drop_explicit(store.find(&fallback_query, fill_selection).await?)
    } else {
        first
    };

    Ok(FeedPage {
        total_posts,
        total_pages: total_pages(total_posts, limit),
        current_page: plan.page,
        posts,
    })
}

/// Second line of defence behind the query-level explicit exclusion.
///
/// A post is dropped when any hashtag is explicit or its body mentions an
/// explicit word.
fn drop_explicit(posts: Vec<Post>) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| {
            !post.hashtags.iter().any(|tag| is_explicit_tag(tag))
                && !contains_explicit_word(&post.body)
        })
        .collect()
}
