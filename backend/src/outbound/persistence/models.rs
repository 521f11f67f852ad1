//! Diesel row structs and their conversions to domain entities.
//!
//! Rows never leave the persistence module. Conversions that can fail
//! (stored labels, JSON columns, user ids) report a message the calling
//! repository wraps in its own query error.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Account, BanId, BanType, BannedUser, Hashtag, HashtagId, Playlist, PlaylistId, Post, PostId,
    Role, User, UserId, Video, VideoId,
};

use super::schema::{banned_users, hashtags, playlists, posts, users, videos};

fn user_id(raw: String, column: &str) -> Result<UserId, String> {
    UserId::try_from(raw).map_err(|err| format!("invalid {column}: {err}"))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub post_hash: String,
    pub body: String,
    pub comment_count: i64,
    pub like_count: i64,
    pub gift_count: i64,
    pub hashtags: Vec<String>,
    pub moment: bool,
    pub poster_public_key: String,
    pub username: Option<String>,
    pub video_url: String,
    pub screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            id: *post.id.as_uuid(),
            post_hash: post.post_hash.clone(),
            body: post.body.clone(),
            comment_count: post.comment_count,
            like_count: post.like_count,
            gift_count: post.gift_count,
            hashtags: post.hashtags.clone(),
            moment: post.moment,
            poster_public_key: post.poster_public_key.clone(),
            username: post.username.clone(),
            video_url: post.video_url.clone(),
            screenshot: post.screenshot.clone(),
            created_at: post.created_at,
        }
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from_uuid(row.id),
            post_hash: row.post_hash,
            body: row.body,
            comment_count: row.comment_count,
            like_count: row.like_count,
            gift_count: row.gift_count,
            hashtags: row.hashtags,
            moment: row.moment,
            poster_public_key: row.poster_public_key,
            username: row.username,
            video_url: row.video_url,
            screenshot: row.screenshot,
            created_at: row.created_at,
        }
    }
}

/// Result row of the hashtag frequency query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct HashtagCountRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub hashtag: String,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users, primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRow {
    pub user_id: String,
    pub accounts: serde_json::Value,
    pub access_token: Option<String>,
    pub preferences: Vec<Uuid>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_user(user: &User) -> Result<Self, String> {
        let accounts = serde_json::to_value(&user.accounts)
            .map_err(|err| format!("serialise accounts: {err}"))?;
        Ok(Self {
            user_id: user.user_id.to_string(),
            accounts,
            access_token: user.access_token.clone(),
            preferences: user.preferences.iter().map(|id| *id.as_uuid()).collect(),
            roles: user.roles.iter().map(|role| role.as_str().to_owned()).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    pub fn into_user(self) -> Result<User, String> {
        let accounts: Vec<Account> =
            serde_json::from_value(self.accounts).map_err(|err| format!("decode accounts: {err}"))?;
        let roles = self
            .roles
            .iter()
            .map(|raw| Role::from_str(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(User {
            user_id: user_id(self.user_id, "user_id")?,
            accounts,
            access_token: self.access_token,
            preferences: self.preferences.into_iter().map(HashtagId::from_uuid).collect(),
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Hashtags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = hashtags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HashtagRow {
    pub id: Uuid,
    pub name: String,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HashtagRow> for Hashtag {
    fn from(row: HashtagRow) -> Self {
        Self {
            id: HashtagId::from_uuid(row.id),
            name: row.name,
            post_count: row.post_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Bans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = banned_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BannedUserRow {
    pub id: Uuid,
    pub user_id: String,
    pub reason: String,
    pub banned_by: String,
    pub ban_type: String,
    pub ban_ends_at: Option<DateTime<Utc>>,
    pub lifted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&BannedUser> for BannedUserRow {
    fn from(ban: &BannedUser) -> Self {
        Self {
            id: *ban.id.as_uuid(),
            user_id: ban.user_id.to_string(),
            reason: ban.reason.clone(),
            banned_by: ban.banned_by.to_string(),
            ban_type: ban.ban_type.as_str().to_owned(),
            ban_ends_at: ban.ban_ends_at,
            lifted_at: ban.lifted_at,
            created_at: ban.created_at,
            updated_at: ban.updated_at,
        }
    }
}

impl TryFrom<BannedUserRow> for BannedUser {
    type Error = String;

    fn try_from(row: BannedUserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BanId::from_uuid(row.id),
            user_id: user_id(row.user_id, "user_id")?,
            reason: row.reason,
            banned_by: user_id(row.banned_by, "banned_by")?,
            ban_type: BanType::from_str(&row.ban_type).map_err(|err| err.to_string())?,
            ban_ends_at: row.ban_ends_at,
            lifted_at: row.lifted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = playlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaylistRow {
    pub id: Uuid,
    pub name: String,
    pub owner_id: String,
    pub post_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Playlist> for PlaylistRow {
    fn from(playlist: &Playlist) -> Self {
        Self {
            id: *playlist.id.as_uuid(),
            name: playlist.name.clone(),
            owner_id: playlist.owner_id.to_string(),
            post_ids: playlist.post_ids.iter().map(|id| *id.as_uuid()).collect(),
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

impl TryFrom<PlaylistRow> for Playlist {
    type Error = String;

    fn try_from(row: PlaylistRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlaylistId::from_uuid(row.id),
            name: row.name,
            owner_id: user_id(row.owner_id, "owner_id")?,
            post_ids: row.post_ids.into_iter().map(PostId::from_uuid).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VideoRow {
    pub id: Uuid,
    pub url: String,
    pub duration: f64,
    pub screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Video> for VideoRow {
    fn from(video: &Video) -> Self {
        Self {
            id: *video.id.as_uuid(),
            url: video.url.clone(),
            duration: video.duration,
            screenshot: video.screenshot.clone(),
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Self {
            id: VideoId::from_uuid(row.id),
            url: row.url,
            duration: row.duration,
            screenshot: row.screenshot,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
