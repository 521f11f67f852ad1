//! HTTP feed and moderation endpoints wired to real services over the
//! in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, test as actix_test, web};
use mockable::Clock;
use reelfeed::domain::feed::FeedService;
use reelfeed::domain::ingestion::{IngestionConfig, IngestionJob};
use reelfeed::domain::ports::{
    NoOpIngestionMetrics, PostCandidate, PostSource, PostSourceError, CapturedThumbnail,
    ThumbnailCapture, ThumbnailCaptureError, UserRepository,
};
use reelfeed::domain::{
    BanService, HashtagService, PlaylistService, PreferenceResolver, Role, User, UserId,
    UserService, VideoService,
};
use reelfeed::inbound::http::api_routes;
use reelfeed::inbound::http::error::{json_error_handler, query_error_handler};
use reelfeed::inbound::http::state::{HttpState, HttpStatePorts};
use reelfeed::outbound::memory::{
    MemoryBanStore, MemoryFeedCache, MemoryHashtagStore, MemoryPlaylistStore, MemoryPostStore,
    MemoryUserStore, MemoryVideoStore,
};
use reelfeed::test_support::clock::MutableClock;
use reelfeed::test_support::fixtures::post;
use rstest::rstest;
use serde_json::{Value, json};

struct EmptySource;

#[async_trait::async_trait]
impl PostSource for EmptySource {
    async fn fetch_candidates(&self, _count: u32) -> Result<Vec<PostCandidate>, PostSourceError> {
        Ok(Vec::new())
    }
}

struct UnusedCapture;

#[async_trait::async_trait]
impl ThumbnailCapture for UnusedCapture {
    async fn capture(&self, _video_url: &str) -> Result<CapturedThumbnail, ThumbnailCaptureError> {
        Err(ThumbnailCaptureError::snapshot("capture not expected"))
    }
}

async fn seeded_state() -> HttpState {
    let clock: Arc<MutableClock> = Arc::new(MutableClock::fixed());
    let mut clean = post("clean", "GOOD", 3);
    clean.body = "harbour sunset".to_owned();
    let mut explicit = post("explicit", "GOOD", 2);
    explicit.hashtags = vec!["#NSFW".to_owned()];
    let banned = post("spam", "SPAMMER", 1);
    let older = post("older", "GOOD", 0);
    let posts = Arc::new(MemoryPostStore::with_posts(vec![clean, explicit, banned, older]));

    let users = Arc::new(MemoryUserStore::new());
    let mut admin = User::register(UserId::new("ADMIN").expect("id"), clock.utc());
    admin.roles.push(Role::Admin);
    users.create(&admin).await.expect("seed admin");
    users
        .create(&User::register(UserId::new("SPAMMER").expect("id"), clock.utc()))
        .await
        .expect("seed spammer");

    let hashtags = Arc::new(MemoryHashtagStore::new());
    let bans = Arc::new(BanService::new(
        Arc::new(MemoryBanStore::new()),
        users.clone(),
        clock.clone(),
    ));
    HttpState::new(HttpStatePorts {
        feed: Arc::new(FeedService::new(
            posts.clone(),
            Arc::new(MemoryFeedCache::new(Duration::from_secs(600))),
            bans.clone(),
            PreferenceResolver::new(users.clone(), hashtags.clone()),
        )),
        bans,
        users: Arc::new(UserService::new(users.clone(), hashtags.clone(), clock.clone())),
        playlists: Arc::new(PlaylistService::new(
            Arc::new(MemoryPlaylistStore::new()),
            users,
            posts.clone(),
            clock.clone(),
        )),
        hashtags: Arc::new(HashtagService::new(posts.clone(), hashtags, clock.clone())),
        videos: Arc::new(VideoService::new(
            Arc::new(MemoryVideoStore::new()),
            Arc::new(UnusedCapture),
            clock.clone(),
        )),
        ingestion: Arc::new(IngestionJob::new(
            Arc::new(EmptySource),
            Arc::new(UnusedCapture),
            posts,
            Arc::new(NoOpIngestionMetrics),
            clock,
            IngestionConfig::default(),
        )),
    })
}

async fn body(response: actix_web::dev::ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response JSON")
}

fn hashes(page: &Value) -> Vec<String> {
    page["posts"]
        .as_array()
        .expect("posts array")
        .iter()
        .map(|post| post["postHash"].as_str().expect("postHash").to_owned())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn feed_hides_explicit_content_and_banned_posters() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state().await))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(web::scope("/api").configure(api_routes)),
    )
    .await;

    let before = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/posts?page=1&limit=3")
            .to_request(),
    )
    .await;
    assert!(before.status().is_success());
    assert_eq!(hashes(&body(before).await), vec!["clean", "spam", "older"]);

    let ban = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/ban-user")
            .set_json(json!({
                "userId": "SPAMMER",
                "bannedBy": "ADMIN",
                "banType": "permanent",
                "reason": "spam"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(ban.status(), actix_web::http::StatusCode::CREATED);

    let after = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/posts?page=1&limit=3&sort_by=latest")
            .to_request(),
    )
    .await;
    let page = body(after).await;
    assert_eq!(hashes(&page), vec!["clean", "older"]);
    assert_eq!(page["currentPage"], 1);
}

#[rstest]
#[actix_web::test]
async fn suggestions_match_title_words() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state().await))
            .service(web::scope("/api").configure(api_routes)),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/suggestions?title=sunset%20cruise")
            .to_request(),
    )
    .await;

    assert!(response.status().is_success());
    let related = body(response).await;
    let posts = related["relatedPosts"].as_array().expect("related posts");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["postHash"], "clean");
}
