//! Playlist handlers.
//!
//! ```text
//! POST   /api/playlists {"name":"Trips","userId":"U1","postIds":["<uuid>"]}
//! PATCH  /api/playlists/{id} {"name":"Trips","userId":"U1","postIds":[]}
//! DELETE /api/playlists/{id} {"userId":"U1"}
//! GET    /api/playlists/users/{userId}
//! GET    /api/playlists/{id}
//! POST   /api/playlists/add-multiple {"userId":"U1","playlistIds":[...],"postIds":[...]}
//! POST   /api/playlists/remove-multiple {"userId":"U1","playlistIds":[...],"postIds":[...]}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{BulkPlaylistRequest, CreatePlaylistRequest, UpdatePlaylistRequest};
use crate::domain::{Error, Playlist, PlaylistId, PlaylistWithPosts, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PlaylistSchema, PlaylistWithPostsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_uuid_error, invalid_uuid_index_error, parse_user_id, require,
};

const NAME: FieldName = FieldName::new("name");
const USER_ID: FieldName = FieldName::new("userId");
const POST_IDS: FieldName = FieldName::new("postIds");
const PLAYLIST_IDS: FieldName = FieldName::new("playlistIds");
const PLAYLIST_ID: FieldName = FieldName::new("playlistId");

fn parse_ids<T>(
    values: Vec<String>,
    field: FieldName,
    parse: fn(&str) -> Result<T, uuid::Error>,
) -> Result<Vec<T>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            parse(value).map_err(|_| invalid_uuid_index_error(field, index, value))
        })
        .collect()
}

fn parse_playlist_id(raw: &str) -> Result<PlaylistId, Error> {
    PlaylistId::parse(raw).map_err(|_| invalid_uuid_error(PLAYLIST_ID, raw))
}

/// Body shared by create and update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistBody {
    #[schema(example = "Trips")]
    pub name: Option<String>,
    #[schema(example = "BC1YLexample")]
    pub user_id: Option<String>,
    /// Post ids in playlist order; repeats are dropped.
    pub post_ids: Option<Vec<String>>,
}

/// Create a playlist.
#[utoipa::path(
    post,
    path = "/api/playlists",
    request_body = PlaylistBody,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistSchema),
        (status = 400, description = "name or userId missing", body = ErrorSchema),
        (status = 422, description = "Owner does not exist", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "createPlaylist"
)]
#[post("/playlists")]
pub async fn create_playlist(
    state: web::Data<HttpState>,
    payload: web::Json<PlaylistBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let name = require(body.name, NAME)?;
    let owner_id = parse_user_id(body.user_id, USER_ID)?;
    let post_ids = parse_ids(body.post_ids.unwrap_or_default(), POST_IDS, PostId::parse)?;
    let playlist = state
        .playlists
        .create(CreatePlaylistRequest {
            name,
            owner_id,
            post_ids,
        })
        .await?;
    Ok(HttpResponse::Created().json(playlist))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistUpdatedResponse {
    #[schema(example = "playlist updated successfully")]
    pub message: String,
    #[schema(value_type = PlaylistSchema)]
    pub playlist: Playlist,
}

/// Rename a playlist and optionally replace its posts.
#[utoipa::path(
    patch,
    path = "/api/playlists/{playlistId}",
    params(("playlistId" = String, Path, format = "uuid")),
    request_body = PlaylistBody,
    responses(
        (status = 200, description = "Playlist updated", body = PlaylistUpdatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "updatePlaylist"
)]
#[patch("/playlists/{playlist_id}")]
pub async fn update_playlist(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PlaylistBody>,
) -> ApiResult<web::Json<PlaylistUpdatedResponse>> {
    let id = parse_playlist_id(&path.into_inner())?;
    let body = payload.into_inner();
    let name = require(body.name, NAME)?;
    let owner_id = parse_user_id(body.user_id, USER_ID)?;
    let post_ids = body
        .post_ids
        .map(|ids| parse_ids(ids, POST_IDS, PostId::parse))
        .transpose()?;
    let playlist = state
        .playlists
        .update(UpdatePlaylistRequest {
            id,
            name,
            owner_id,
            post_ids,
        })
        .await?;
    Ok(web::Json(PlaylistUpdatedResponse {
        message: "playlist updated successfully".to_owned(),
        playlist,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBody {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Delete a playlist owned by `userId`.
#[utoipa::path(
    delete,
    path = "/api/playlists/{playlistId}",
    params(("playlistId" = String, Path, format = "uuid")),
    request_body = OwnerBody,
    responses(
        (status = 200, description = "playlist deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "deletePlaylist"
)]
#[delete("/playlists/{playlist_id}")]
pub async fn delete_playlist(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<OwnerBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_playlist_id(&path.into_inner())?;
    let owner_id = parse_user_id(payload.into_inner().user_id, USER_ID)?;
    state.playlists.delete(&id, &owner_id).await?;
    Ok(web::Json(MessageResponse {
        message: "playlist deleted".to_owned(),
    }))
}

/// Every playlist owned by a user, posts resolved.
#[utoipa::path(
    get,
    path = "/api/playlists/users/{userId}",
    params(("userId" = String, Path)),
    responses(
        (status = 200, description = "Playlists", body = [PlaylistWithPostsSchema]),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "getUserPlaylists"
)]
#[get("/playlists/users/{user_id}")]
pub async fn user_playlists(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PlaylistWithPosts>>> {
    let owner_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    Ok(web::Json(state.playlists.list_for_owner(&owner_id).await?))
}

/// One playlist, posts resolved.
#[utoipa::path(
    get,
    path = "/api/playlists/{playlistId}",
    params(("playlistId" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Playlist", body = PlaylistWithPostsSchema),
        (status = 404, description = "playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "showPlaylist"
)]
#[get("/playlists/{playlist_id}")]
pub async fn show_playlist(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaylistWithPosts>> {
    let id = parse_playlist_id(&path.into_inner())?;
    Ok(web::Json(state.playlists.get(&id).await?))
}

/// Bulk membership change across several playlists.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkPlaylistBody {
    pub user_id: Option<String>,
    pub playlist_ids: Option<Vec<String>>,
    pub post_ids: Option<Vec<String>>,
}

impl BulkPlaylistBody {
    fn into_request(self) -> Result<BulkPlaylistRequest, Error> {
        Ok(BulkPlaylistRequest {
            owner_id: parse_user_id(self.user_id, USER_ID)?,
            playlist_ids: parse_ids(
                self.playlist_ids.unwrap_or_default(),
                PLAYLIST_IDS,
                PlaylistId::parse,
            )?,
            post_ids: parse_ids(self.post_ids.unwrap_or_default(), POST_IDS, PostId::parse)?,
        })
    }
}

/// Append posts to every listed playlist.
#[utoipa::path(
    post,
    path = "/api/playlists/add-multiple",
    request_body = BulkPlaylistBody,
    responses(
        (status = 200, description = "Updated playlists", body = [PlaylistSchema]),
        (status = 401, description = "A playlist is not owned by userId", body = ErrorSchema),
        (status = 404, description = "A playlist does not exist", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "addToMultiplePlaylists"
)]
#[post("/playlists/add-multiple")]
pub async fn add_to_multiple(
    state: web::Data<HttpState>,
    payload: web::Json<BulkPlaylistBody>,
) -> ApiResult<web::Json<Vec<Playlist>>> {
    let request = payload.into_inner().into_request()?;
    Ok(web::Json(state.playlists.add_posts(request).await?))
}

/// Remove posts from every listed playlist.
#[utoipa::path(
    post,
    path = "/api/playlists/remove-multiple",
    request_body = BulkPlaylistBody,
    responses(
        (status = 200, description = "Updated playlists", body = [PlaylistSchema]),
        (status = 401, description = "A playlist is not owned by userId", body = ErrorSchema),
        (status = 404, description = "A playlist does not exist", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "removeFromMultiplePlaylists"
)]
#[post("/playlists/remove-multiple")]
pub async fn remove_from_multiple(
    state: web::Data<HttpState>,
    payload: web::Json<BulkPlaylistBody>,
) -> ApiResult<web::Json<Vec<Playlist>>> {
    let request = payload.into_inner().into_request()?;
    Ok(web::Json(state.playlists.remove_posts(request).await?))
}

#[cfg(test)]
#[path = "playlists_tests.rs"]
mod tests;
