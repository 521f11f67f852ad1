//! PostgreSQL adapters built on Diesel, `diesel-async` and bb8.
//!
//! Repositories translate between row structs (`models`) and domain
//! entities; rows and the schema never leave this module. Every Diesel and
//! pool failure is mapped onto the owning port's error enum.

mod diesel_banned_user_repository;
mod diesel_hashtag_repository;
mod diesel_playlist_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod diesel_video_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_banned_user_repository::DieselBannedUserRepository;
pub use diesel_hashtag_repository::DieselHashtagRepository;
pub use diesel_playlist_repository::DieselPlaylistRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_video_repository::DieselVideoRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
