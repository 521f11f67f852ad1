//! Feed filter builder.
//!
//! [`PostsFilter`] accumulates request signals through by-value mutators.
//! Before anything reaches a store it is reduced with
//! [`PostsFilter::strip_empty`] into a [`PostsQuery`], whose optional clauses
//! are never present-but-empty. Repositories only accept [`PostsQuery`], so an
//! empty inclusion set can never be executed as "match nothing".

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Post, PostId};

/// Ordering of feed results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FeedSort {
    /// Newest first.
    #[default]
    Latest,
    /// Highest like count first.
    MostLiked,
    /// Highest comment count first.
    MostCommented,
}

impl FeedSort {
    /// Map the `sort_by` query value; unknown or absent values sort by
    /// recency.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("most_liked") => Self::MostLiked,
            Some("most_commented") => Self::MostCommented,
            _ => Self::Latest,
        }
    }
}

/// Skip, limit and ordering for one store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostsSelection {
    /// Rows to skip before the first returned post.
    pub skip: u64,
    /// Maximum number of posts returned.
    pub limit: u32,
    pub sort: FeedSort,
}

/// Mutable-by-value filter threaded through the feed pipeline.
///
/// Every mutator takes `self` and returns the updated filter, so two filters
/// never share their id or hashtag lists.
///
/// # Examples
/// ```
/// use reelfeed::domain::feed::PostsFilter;
///
/// let query = PostsFilter::new()
///     .with_moment(Some("true"))
///     .with_hashtags(vec!["#travel".into()])
///     .strip_empty();
/// assert!(query.moment);
/// assert_eq!(query.include_hashtags.as_deref(), Some(&["#travel".to_owned()][..]));
/// assert!(query.exclude_ids.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsFilter {
    moment: bool,
    include_hashtags: Vec<String>,
    exclude_hashtags: Vec<String>,
    exclude_ids: Vec<PostId>,
    banned_posters: Vec<String>,
    search_tokens: Vec<String>,
}

impl PostsFilter {
    /// Empty filter matching non-moment posts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the literal `"true"` selects moments.
    #[must_use]
    pub fn with_moment(mut self, raw: Option<&str>) -> Self {
        self.moment = raw == Some("true");
        self
    }

    /// Restrict to posts carrying any of `tags` (case-insensitive exact
    /// match). An empty list leaves the current inclusion untouched.
    #[must_use]
    pub fn with_hashtags(mut self, tags: Vec<String>) -> Self {
        if !tags.is_empty() {
            self.include_hashtags = tags;
        }
        self
    }

    /// Remove any hashtag inclusion, keeping exclusions.
    #[must_use]
    pub fn without_hashtag_bias(mut self) -> Self {
        self.include_hashtags.clear();
        self
    }

    /// Exclude posts carrying any of `tags` (case-insensitive exact match).
    #[must_use]
    pub fn with_excluded_hashtags(mut self, tags: Vec<String>) -> Self {
        self.exclude_hashtags = tags;
        self
    }

    /// Exclude the given post ids, replacing any earlier exclusion.
    #[must_use]
    pub fn with_excluded_ids(mut self, ids: Vec<PostId>) -> Self {
        self.exclude_ids = ids;
        self
    }

    /// Exclude posts whose poster is currently banned.
    #[must_use]
    pub fn with_banned_user_ids(mut self, ids: Vec<String>) -> Self {
        self.banned_posters = ids;
        self
    }

    /// Full-text search over post bodies using the word tokens of `text`.
    /// Text without word characters leaves the filter unchanged.
    #[must_use]
    pub fn with_related_search(mut self, text: &str) -> Self {
        let tokens = tokenize(text);
        if !tokens.is_empty() {
            self.search_tokens = tokens;
        }
        self
    }

    /// Reduce to an executable query with vacuous clauses removed.
    #[must_use]
    pub fn strip_empty(self) -> PostsQuery {
        PostsQuery {
            moment: self.moment,
            include_hashtags: non_empty(self.include_hashtags),
            exclude_hashtags: non_empty(self.exclude_hashtags),
            exclude_ids: non_empty(self.exclude_ids),
            banned_posters: non_empty(self.banned_posters),
            search_tokens: non_empty(self.search_tokens),
        }
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

static WORD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\w+").ok());

/// Split free text into word tokens, dropping punctuation and whitespace.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .as_ref()
        .map(|pattern| {
            pattern
                .find_iter(text)
                .map(|found| found.as_str().to_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Executable post query. Every `Some` clause is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsQuery {
    /// Required value of [`Post::moment`].
    pub moment: bool,
    /// Post must carry at least one of these `#`-prefixed tags.
    pub include_hashtags: Option<Vec<String>>,
    /// Post must carry none of these `#`-prefixed tags.
    pub exclude_hashtags: Option<Vec<String>>,
    /// Ids already returned by an earlier pass.
    pub exclude_ids: Option<Vec<PostId>>,
    /// Poster public keys whose posts are hidden.
    pub banned_posters: Option<Vec<String>>,
    /// Matched as "any token", like a full-text OR query.
    pub search_tokens: Option<Vec<String>>,
}

impl PostsQuery {
    /// Evaluate the query against one post.
    ///
    /// Used by the in-memory store; the SQL adapter translates the same
    /// clauses into `WHERE` predicates.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        if post.moment != self.moment {
            return false;
        }
        if let Some(tags) = &self.include_hashtags {
            if !post.has_any_hashtag(tags) {
                return false;
            }
        }
        if let Some(tags) = &self.exclude_hashtags {
            if post.has_any_hashtag(tags) {
                return false;
            }
        }
        if let Some(ids) = &self.exclude_ids {
            if ids.contains(&post.id) {
                return false;
            }
        }
        if let Some(posters) = &self.banned_posters {
            if posters.contains(&post.poster_public_key) {
                return false;
            }
        }
        if let Some(tokens) = &self.search_tokens {
            let words = tokenize(&post.body);
            let hit = tokens
                .iter()
                .any(|token| words.iter().any(|word| word.eq_ignore_ascii_case(token)));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::post;
    use rstest::rstest;

    #[rstest]
    #[case::absent(None, false)]
    #[case::truthy(Some("true"), true)]
    #[case::uppercase(Some("TRUE"), false)]
    #[case::other(Some("1"), false)]
    fn moment_requires_literal_true(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(PostsFilter::new().with_moment(raw).strip_empty().moment, expected);
    }

    #[rstest]
    fn strip_empty_drops_every_vacuous_clause() {
        let query = PostsFilter::new()
            .with_hashtags(Vec::new())
            .with_excluded_hashtags(Vec::new())
            .with_excluded_ids(Vec::new())
            .with_banned_user_ids(Vec::new())
            .with_related_search("  ...  ")
            .strip_empty();

        assert_eq!(
            query,
            PostsQuery {
                moment: false,
                include_hashtags: None,
                exclude_hashtags: None,
                exclude_ids: None,
                banned_posters: None,
                search_tokens: None,
            }
        );
    }

    #[rstest]
    fn strip_empty_never_yields_empty_lists() {
        let filters = [
            PostsFilter::new(),
            PostsFilter::new().with_hashtags(vec!["#a".into()]),
            PostsFilter::new().with_excluded_ids(vec![PostId::generate()]),
            PostsFilter::new()
                .with_hashtags(vec!["#a".into()])
                .without_hashtag_bias()
                .with_banned_user_ids(vec!["P1".into()]),
            PostsFilter::new().with_related_search("hello, world"),
        ];
        for filter in filters {
            let query = filter.strip_empty();
            assert!(query.include_hashtags.is_none_or(|v| !v.is_empty()));
            assert!(query.exclude_hashtags.is_none_or(|v| !v.is_empty()));
            assert!(query.exclude_ids.is_none_or(|v| !v.is_empty()));
            assert!(query.banned_posters.is_none_or(|v| !v.is_empty()));
            assert!(query.search_tokens.is_none_or(|v| !v.is_empty()));
        }
    }

    #[rstest]
    fn mutators_do_not_share_state() {
        let base = PostsFilter::new().with_hashtags(vec!["#a".into()]);
        let unbiased = base.clone().without_hashtag_bias();
        assert!(base.strip_empty().include_hashtags.is_some());
        assert!(unbiased.strip_empty().include_hashtags.is_none());
    }

    #[rstest]
    fn excluded_ids_are_replaced() {
        let (first, second) = (PostId::generate(), PostId::generate());
        let query = PostsFilter::new()
            .with_excluded_ids(vec![first])
            .with_excluded_ids(vec![second])
            .strip_empty();
        assert_eq!(query.exclude_ids, Some(vec![second]));
    }

    #[rstest]
    fn tokenizer_splits_on_punctuation() {
        assert_eq!(tokenize("Hello, world! it's"), vec!["Hello", "world", "it", "s"]);
        assert!(tokenize(" -- ").is_empty());
    }

    #[rstest]
    fn query_matches_hashtags_case_insensitively() {
        let mut sample = post("h1", "P1", 0);
        sample.hashtags = vec!["#Travel".into(), "#NSFW".into()];

        let include = PostsFilter::new()
            .with_hashtags(vec!["#travel".into()])
            .strip_empty();
        let exclude = PostsFilter::new()
            .with_excluded_hashtags(vec!["#nsfw".into()])
            .strip_empty();
        assert!(include.matches(&sample));
        assert!(!exclude.matches(&sample));
    }

    #[rstest]
    fn query_excludes_banned_posters_and_ids() {
        let sample = post("h1", "BANNED", 0);
        let banned = PostsFilter::new()
            .with_banned_user_ids(vec!["BANNED".into()])
            .strip_empty();
        let by_id = PostsFilter::new()
            .with_excluded_ids(vec![sample.id])
            .strip_empty();
        assert!(!banned.matches(&sample));
        assert!(!by_id.matches(&sample));
        assert!(PostsFilter::new().strip_empty().matches(&sample));
    }

    #[rstest]
    fn query_search_matches_any_token() {
        let mut sample = post("h1", "P1", 0);
        sample.body = "Sunset over the harbour".into();
        let hit = PostsFilter::new()
            .with_related_search("harbour lights")
            .strip_empty();
        let miss = PostsFilter::new().with_related_search("mountain").strip_empty();
        assert!(hit.matches(&sample));
        assert!(!miss.matches(&sample));
    }

    #[rstest]
    #[case(None, FeedSort::Latest)]
    #[case(Some("most_liked"), FeedSort::MostLiked)]
    #[case(Some("most_commented"), FeedSort::MostCommented)]
    #[case(Some("random"), FeedSort::Latest)]
    fn sort_from_query(#[case] raw: Option<&str>, #[case] expected: FeedSort) {
        assert_eq!(FeedSort::from_query(raw), expected);
    }
}
