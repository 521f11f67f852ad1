//! Feed cache keys and the freshness rule for cached pages.

use super::FeedPage;

/// Composite cache key for one feed page.
///
/// # Examples
/// ```
/// use reelfeed::domain::feed::feed_cache_key;
///
/// assert_eq!(feed_cache_key(2, 10, false, None), "postsData-page2-limit10-momentfalse");
/// assert_eq!(
///     feed_cache_key(1, 5, true, Some("travel")),
///     "postsData-page1-limit5-momenttrue-hashtagtravel",
/// );
/// ```
#[must_use]
pub fn feed_cache_key(page: u32, limit: u32, moment: bool, hashtag: Option<&str>) -> String {
    let mut key = format!("postsData-page{page}-limit{limit}-moment{moment}");
    if let Some(tag) = hashtag.filter(|tag| !tag.is_empty()) {
        key.push_str("-hashtag");
        key.push_str(tag);
    }
    key
}

/// Re-check a cached page against the current banned set.
///
/// Posts by banned users are removed. When fewer than half of `limit` posts
/// survive, the page is stale and `None` is returned so the caller
/// recomputes; otherwise the filtered page is served.
#[must_use]
pub fn revalidate_cached(mut page: FeedPage, banned: &[String], limit: u32) -> Option<FeedPage> {
    page.posts
        .retain(|post| !banned.contains(&post.poster_public_key));
    let survivors = u64::try_from(page.posts.len()).unwrap_or(u64::MAX);
    (survivors.saturating_mul(2) >= u64::from(limit)).then_some(page)
}
