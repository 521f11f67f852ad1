//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the wrapper schemas in [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::bans::{
    CreateBanBody, IsBannedResponse, LiftBanBody, LiftBanResponse,
};
use crate::inbound::http::hashtags::MigrateHashtagsResponse;
use crate::inbound::http::playlists::{
    BulkPlaylistBody, MessageResponse, OwnerBody, PlaylistBody, PlaylistUpdatedResponse,
};
use crate::inbound::http::posts::{IngestResponse, SuggestionsResponse};
use crate::inbound::http::schemas::{
    BanTypeSchema, BannedUserSchema, ErrorCodeSchema, ErrorSchema, FeedPageSchema,
    HashtagCountSchema, HashtagSchema, PlaylistSchema, PlaylistWithPostsSchema, PostSchema,
    VideoSchema,
};
use crate::inbound::http::users::{
    AccountResponse, CreateUserBody, CreateUserResponse, PreferenceResponse,
    UpdatePreferencesBody, UpdateUserBody, UserResponse,
};
use crate::inbound::http::videos::{
    VideoBody, VideoCreatedResponse, VideoDeletedResponse, VideoInfoResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelfeed backend API",
        description = "Moderated short-form video feed with users, playlists and bans.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::posts::get_posts,
        crate::inbound::http::posts::create_posts,
        crate::inbound::http::posts::get_suggestions,
        crate::inbound::http::hashtags::top_hashtags,
        crate::inbound::http::hashtags::list_hashtags,
        crate::inbound::http::hashtags::migrate_hashtags,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::get_preferences,
        crate::inbound::http::users::update_preferences,
        crate::inbound::http::playlists::create_playlist,
        crate::inbound::http::playlists::update_playlist,
        crate::inbound::http::playlists::delete_playlist,
        crate::inbound::http::playlists::user_playlists,
        crate::inbound::http::playlists::show_playlist,
        crate::inbound::http::playlists::add_to_multiple,
        crate::inbound::http::playlists::remove_from_multiple,
        crate::inbound::http::bans::create_ban,
        crate::inbound::http::bans::lift_ban,
        crate::inbound::http::bans::ban_history,
        crate::inbound::http::bans::is_banned,
        crate::inbound::http::videos::video_info,
        crate::inbound::http::videos::video_list,
        crate::inbound::http::videos::create_video,
        crate::inbound::http::videos::delete_video,
        crate::inbound::http::images::serve_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PostSchema,
        FeedPageSchema,
        HashtagCountSchema,
        HashtagSchema,
        PlaylistSchema,
        PlaylistWithPostsSchema,
        BanTypeSchema,
        BannedUserSchema,
        IngestResponse,
        SuggestionsResponse,
        MigrateHashtagsResponse,
        AccountResponse,
        PreferenceResponse,
        UserResponse,
        CreateUserBody,
        CreateUserResponse,
        UpdateUserBody,
        UpdatePreferencesBody,
        PlaylistBody,
        PlaylistUpdatedResponse,
        OwnerBody,
        MessageResponse,
        BulkPlaylistBody,
        CreateBanBody,
        LiftBanBody,
        LiftBanResponse,
        IsBannedResponse,
        VideoSchema,
        VideoBody,
        VideoInfoResponse,
        VideoCreatedResponse,
        VideoDeletedResponse,
    )),
    tags(
        (name = "posts", description = "Feed, suggestions and manual ingestion"),
        (name = "hashtags", description = "Hashtag listings and backfill"),
        (name = "users", description = "User accounts and preferences"),
        (name = "playlists", description = "User playlists"),
        (name = "moderation", description = "User bans"),
        (name = "videos", description = "Video duration and screenshot records"),
        (name = "images", description = "Post thumbnails"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
