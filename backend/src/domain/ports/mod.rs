//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (stores, cache, upstream, capture, metrics) are implemented
//! in `outbound`. Driving ports are implemented by the domain services and
//! consumed by `inbound::http` as trait objects.

mod macros;
pub(crate) use macros::define_port_error;

mod ban_registry;
mod banned_user_repository;
mod feed_cache;
mod feed_query;
mod hashtag_catalogue;
mod hashtag_repository;
mod ingestion_metrics;
mod playlist_management;
mod playlist_repository;
mod post_ingestion;
mod post_repository;
mod post_source;
mod thumbnail_capture;
mod user_accounts;
mod user_repository;
mod video_library;
mod video_repository;

#[cfg(test)]
pub use ban_registry::MockBanRegistry;
pub use ban_registry::{BanRegistry, CreateBanRequest, LiftBanRequest};
#[cfg(test)]
pub use banned_user_repository::MockBannedUserRepository;
pub use banned_user_repository::{BannedUserRepository, BannedUserRepositoryError};
#[cfg(test)]
pub use feed_cache::MockFeedCache;
pub use feed_cache::{FeedCache, FeedCacheError};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedQuery, FeedRequest};
pub use hashtag_catalogue::HashtagCatalogue;
#[cfg(test)]
pub use hashtag_catalogue::MockHashtagCatalogue;
#[cfg(test)]
pub use hashtag_repository::MockHashtagRepository;
pub use hashtag_repository::{HashtagRepository, HashtagRepositoryError};
#[cfg(test)]
pub use ingestion_metrics::MockIngestionMetrics;
pub use ingestion_metrics::{IngestionMetrics, IngestionMetricsError, NoOpIngestionMetrics};
#[cfg(test)]
pub use playlist_management::MockPlaylistManagement;
pub use playlist_management::{
    BulkPlaylistRequest, CreatePlaylistRequest, PlaylistManagement, UpdatePlaylistRequest,
};
#[cfg(test)]
pub use playlist_repository::MockPlaylistRepository;
pub use playlist_repository::{PlaylistRepository, PlaylistRepositoryError};
#[cfg(test)]
pub use post_ingestion::MockPostIngestion;
pub use post_ingestion::PostIngestion;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use post_source::MockPostSource;
pub use post_source::{PostCandidate, PostSource, PostSourceError};
#[cfg(test)]
pub use thumbnail_capture::MockThumbnailCapture;
pub use thumbnail_capture::{CapturedThumbnail, ThumbnailCapture, ThumbnailCaptureError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{UpdateUserRequest, UserAccounts, UserProfile};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use video_library::MockVideoLibrary;
pub use video_library::{NewVideo, VideoLibrary};
#[cfg(test)]
pub use video_repository::MockVideoRepository;
pub use video_repository::{VideoRepository, VideoRepositoryError};
