//! Builders for the driven adapters and the services over them.
//!
//! With a database pool every store is Diesel-backed; without one the
//! in-memory adapters are used, which keeps local runs dependency-free.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use reelfeed::domain::feed::FeedService;
use reelfeed::domain::ingestion::{IngestionConfig, IngestionJob};
use reelfeed::domain::ports::{
    BannedUserRepository, FeedCache, HashtagRepository, IngestionMetrics, PlaylistRepository,
    PostRepository, PostSource, ThumbnailCapture, UserRepository, VideoRepository,
};
use reelfeed::domain::{
    BanService, HashtagService, PlaylistService, PreferenceResolver, UserService, VideoService,
};
use reelfeed::inbound::http::state::{HttpState, HttpStatePorts};
use reelfeed::outbound::cache::RedisFeedCache;
use reelfeed::outbound::memory::{
    MemoryBanStore, MemoryFeedCache, MemoryHashtagStore, MemoryPlaylistStore, MemoryPostStore,
    MemoryUserStore, MemoryVideoStore,
};
use reelfeed::outbound::persistence::{
    DbPool, DieselBannedUserRepository, DieselHashtagRepository, DieselPlaylistRepository,
    DieselPostRepository, DieselUserRepository, DieselVideoRepository,
};
use reelfeed::settings::AppSettings;

/// Every store port, either all Diesel-backed or all in-memory.
#[derive(Clone)]
pub(crate) struct Stores {
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) hashtags: Arc<dyn HashtagRepository>,
    pub(crate) bans: Arc<dyn BannedUserRepository>,
    pub(crate) playlists: Arc<dyn PlaylistRepository>,
    pub(crate) videos: Arc<dyn VideoRepository>,
}

impl Stores {
    pub(crate) fn diesel(pool: &DbPool) -> Self {
        Self {
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            hashtags: Arc::new(DieselHashtagRepository::new(pool.clone())),
            bans: Arc::new(DieselBannedUserRepository::new(pool.clone())),
            playlists: Arc::new(DieselPlaylistRepository::new(pool.clone())),
            videos: Arc::new(DieselVideoRepository::new(pool.clone())),
        }
    }

    pub(crate) fn in_memory() -> Self {
        Self {
            posts: Arc::new(MemoryPostStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            hashtags: Arc::new(MemoryHashtagStore::new()),
            bans: Arc::new(MemoryBanStore::new()),
            playlists: Arc::new(MemoryPlaylistStore::new()),
            videos: Arc::new(MemoryVideoStore::new()),
        }
    }
}

/// Connect to Redis when configured, falling back to the in-memory cache
/// when no URL is set or the connection fails.
pub(crate) async fn build_feed_cache(settings: &AppSettings) -> Arc<dyn FeedCache> {
    let ttl = settings.feed_cache_ttl();
    if let Some(url) = settings.redis_url() {
        match RedisFeedCache::connect(url, ttl).await {
            Ok(cache) => {
                info!("feed cache: redis");
                return Arc::new(cache);
            }
            Err(err) => warn!(error = %err, "redis unavailable; using in-memory feed cache"),
        }
    }
    Arc::new(MemoryFeedCache::new(ttl))
}

/// Adapters the ingestion job drives besides the post store.
pub(crate) struct IngestionAdapters {
    pub(crate) source: Arc<dyn PostSource>,
    pub(crate) capture: Arc<dyn ThumbnailCapture>,
    pub(crate) metrics: Arc<dyn IngestionMetrics>,
    pub(crate) config: IngestionConfig,
}

/// Services wired for both the HTTP surface and the scheduler.
pub(crate) struct AppServices {
    pub(crate) http_state: HttpState,
    pub(crate) ingestion: Arc<IngestionJob>,
}

pub(crate) fn build_services(
    stores: Stores,
    cache: Arc<dyn FeedCache>,
    ingestion: IngestionAdapters,
) -> AppServices {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let bans = Arc::new(BanService::new(
        stores.bans.clone(),
        stores.users.clone(),
        clock.clone(),
    ));
    let feed = Arc::new(FeedService::new(
        stores.posts.clone(),
        cache,
        bans.clone(),
        PreferenceResolver::new(stores.users.clone(), stores.hashtags.clone()),
    ));
    let videos = Arc::new(VideoService::new(
        stores.videos.clone(),
        ingestion.capture.clone(),
        clock.clone(),
    ));
    let job = Arc::new(IngestionJob::new(
        ingestion.source,
        ingestion.capture,
        stores.posts.clone(),
        ingestion.metrics,
        clock.clone(),
        ingestion.config,
    ));
    let http_state = HttpState::new(HttpStatePorts {
        feed,
        bans,
        users: Arc::new(UserService::new(
            stores.users.clone(),
            stores.hashtags.clone(),
            clock.clone(),
        )),
        playlists: Arc::new(PlaylistService::new(
            stores.playlists.clone(),
            stores.users.clone(),
            stores.posts.clone(),
            clock.clone(),
        )),
        hashtags: Arc::new(HashtagService::new(
            stores.posts.clone(),
            stores.hashtags.clone(),
            clock,
        )),
        ingestion: job.clone(),
        videos,
    });
    AppServices {
        http_state,
        ingestion: job,
    }
}
