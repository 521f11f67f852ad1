//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape and are registered with
//! utoipa under the domain type names.

use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error payload.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "missing required field: userId")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    trace_id: Option<String>,
    /// Field-level context for validation failures.
    details: Option<serde_json::Value>,
}

/// An ingested video post.
#[derive(ToSchema)]
#[schema(as = Post, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PostSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Upstream natural key.
    post_hash: String,
    body: String,
    comment_count: i64,
    like_count: i64,
    gift_count: i64,
    #[schema(example = json!(["#travel"]))]
    hashtags: Vec<String>,
    moment: bool,
    poster_public_key: String,
    username: Option<String>,
    video_url: String,
    #[schema(example = "/images/0b9d6a34-62f4-4bb4-8f6c-6f3c1a2f9c11.png")]
    screenshot: Option<String>,
    created_at: DateTime<Utc>,
}

/// One page of the feed.
#[derive(ToSchema)]
#[schema(as = FeedPage, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FeedPageSchema {
    total_posts: u64,
    total_pages: u64,
    current_page: u32,
    posts: Vec<PostSchema>,
}

/// Usage count for one post hashtag.
#[derive(ToSchema)]
#[schema(as = HashtagCount)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct HashtagCountSchema {
    #[schema(example = "#travel")]
    hashtag: String,
    count: i64,
}

/// A stored hashtag document.
#[derive(ToSchema)]
#[schema(as = Hashtag, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct HashtagSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Lower-case name without `#`.
    name: String,
    post_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A playlist with post ids.
#[derive(ToSchema)]
#[schema(as = Playlist, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PlaylistSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    name: String,
    owner_id: String,
    #[schema(value_type = Vec<String>)]
    post_ids: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A playlist with its posts resolved.
#[derive(ToSchema)]
#[schema(as = PlaylistWithPosts, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PlaylistWithPostsSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    name: String,
    owner_id: String,
    posts: Vec<PostSchema>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Whether a ban expires.
#[derive(ToSchema)]
#[schema(as = BanType)]
pub enum BanTypeSchema {
    #[schema(rename = "temporary")]
    Temporary,
    #[schema(rename = "permanent")]
    Permanent,
}

/// One ban record.
#[derive(ToSchema)]
#[schema(as = BannedUser, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct BannedUserSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    user_id: String,
    reason: String,
    banned_by: String,
    ban_type: BanTypeSchema,
    ban_ends_at: Option<DateTime<Utc>>,
    lifted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}


/// An inspected or caller-supplied video record.
#[derive(ToSchema)]
#[schema(as = Video, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct VideoSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    url: String,
    /// Length in seconds.
    duration: f64,
    #[schema(example = "/images/0b9d6a34-62f4-4bb4-8f6c-6f3c1a2f9c11.png")]
    screenshot: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
