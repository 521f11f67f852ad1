//! HTTP inbound adapter exposing REST endpoints.

pub mod bans;
pub mod cache_control;
pub mod error;
pub mod hashtags;
pub mod health;
pub mod images;
pub mod playlists;
pub mod posts;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod videos;

use actix_web::web;

pub use error::ApiResult;

/// Register every JSON endpoint; the caller mounts them under `/api`.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::get_posts)
        .service(posts::create_posts)
        .service(posts::get_suggestions)
        .service(hashtags::top_hashtags)
        .service(hashtags::list_hashtags)
        .service(hashtags::migrate_hashtags)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::get_preferences)
        .service(users::update_preferences)
        .service(playlists::create_playlist)
        .service(playlists::add_to_multiple)
        .service(playlists::remove_from_multiple)
        .service(playlists::user_playlists)
        .service(playlists::show_playlist)
        .service(playlists::update_playlist)
        .service(playlists::delete_playlist)
        .service(bans::create_ban)
        .service(bans::lift_ban)
        .service(bans::ban_history)
        .service(bans::is_banned)
        .service(videos::video_info)
        .service(videos::video_list)
        .service(videos::create_video)
        .service(videos::delete_video);
}
