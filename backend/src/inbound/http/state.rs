//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BanRegistry, FeedQuery, HashtagCatalogue, PlaylistManagement, PostIngestion, UserAccounts,
    VideoLibrary,
};

/// Parameter object bundling every port implementation for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub feed: Arc<dyn FeedQuery>,
    pub bans: Arc<dyn BanRegistry>,
    pub users: Arc<dyn UserAccounts>,
    pub playlists: Arc<dyn PlaylistManagement>,
    pub hashtags: Arc<dyn HashtagCatalogue>,
    pub ingestion: Arc<dyn PostIngestion>,
    pub videos: Arc<dyn VideoLibrary>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<dyn FeedQuery>,
    pub bans: Arc<dyn BanRegistry>,
    pub users: Arc<dyn UserAccounts>,
    pub playlists: Arc<dyn PlaylistManagement>,
    pub hashtags: Arc<dyn HashtagCatalogue>,
    pub ingestion: Arc<dyn PostIngestion>,
    pub videos: Arc<dyn VideoLibrary>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            feed,
            bans,
            users,
            playlists,
            hashtags,
            ingestion,
            videos,
        } = ports;
        Self {
            feed,
            bans,
            users,
            playlists,
            hashtags,
            ingestion,
            videos,
        }
    }
}
