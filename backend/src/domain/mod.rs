//! Domain primitives, aggregates and services.
//!
//! Entities are plain data with validated identifiers. Services implement the
//! driving ports in [`ports`] over the driven ports, and own every business
//! rule: feed composition, moderation, ingestion, ownership checks.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Post`], [`User`], [`Hashtag`], [`BannedUser`], [`Playlist`], [`Video`]:
//!   entities.
//! - [`feed`]: filter builder, executor and cache policy.
//! - [`ingestion`]: the scrape-and-dedupe job.

pub mod ban;
pub mod ban_service;
pub mod error;
pub mod explicit_words;
pub mod feed;
pub mod hashtag;
pub mod hashtag_service;
pub mod ingestion;
pub mod playlist;
pub mod playlist_service;
pub mod ports;
pub mod post;
pub mod preferences;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod video;
pub mod video_service;

pub use self::ban::{BanId, BanType, BanTypeParseError, BannedUser};
pub use self::ban_service::BanService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::explicit_words::{
    contains_explicit_word, explicit_hashtags, explicit_words, is_explicit_tag,
};
pub use self::hashtag::{Hashtag, HashtagCount, HashtagId, normalize_tag};
pub use self::hashtag_service::HashtagService;
pub use self::playlist::{Playlist, PlaylistId, PlaylistWithPosts, dedupe_post_ids};
pub use self::playlist_service::PlaylistService;
pub use self::post::{Post, PostId, extract_hashtags};
pub use self::preferences::PreferenceResolver;
pub use self::trace_id::TraceId;
pub use self::user::{
    Account, AccountName, AccountUpdate, Role, USER_ID_MAX, UnsupportedAccountError, User,
    UserId, UserIdValidationError,
};
pub use self::user_service::UserService;
pub use self::video::{Video, VideoId};
pub use self::video_service::VideoService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use reelfeed::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("playlist not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
