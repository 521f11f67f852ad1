//! Moderation handlers.
//!
//! ```text
//! POST  /api/ban-user {"userId":"U2","bannedBy":"ADMIN","reason":"spam","banType":"temporary","banEndsAt":"2026-02-01T00:00:00Z"}
//! PATCH /api/ban-user/lift-ban {"userId":"U2","bannedBy":"ADMIN"}
//! GET   /api/ban-user/{userId}/history
//! GET   /api/ban-user/{userId}/is-banned
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateBanRequest, LiftBanRequest};
use crate::domain::{BanType, BannedUser, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{BanTypeSchema, BannedUserSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_optional_rfc3339_timestamp, parse_user_id, require,
};

const REASON: FieldName = FieldName::new("reason");
const USER_ID: FieldName = FieldName::new("userId");
const BANNED_BY: FieldName = FieldName::new("bannedBy");
const BAN_TYPE: FieldName = FieldName::new("banType");
const BAN_ENDS_AT: FieldName = FieldName::new("banEndsAt");

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBanBody {
    #[schema(example = "spam")]
    pub reason: Option<String>,
    pub user_id: Option<String>,
    /// Admin issuing the ban.
    pub banned_by: Option<String>,
    #[schema(value_type = Option<BanTypeSchema>)]
    pub ban_type: Option<String>,
    /// RFC 3339; required and in the future for temporary bans.
    #[schema(format = DateTime, example = "2026-02-01T00:00:00Z")]
    pub ban_ends_at: Option<String>,
}

impl CreateBanBody {
    fn into_request(self) -> Result<CreateBanRequest, Error> {
        let reason = require(self.reason, REASON)?;
        let user_id = parse_user_id(self.user_id, USER_ID)?;
        let banned_by = parse_user_id(self.banned_by, BANNED_BY)?;
        let raw_type = self.ban_type.unwrap_or_default();
        let ban_type = BanType::from_str(&raw_type)
            .map_err(|_| invalid_value_error(BAN_TYPE, "invalid banType", &raw_type))?;
        let ban_ends_at = parse_optional_rfc3339_timestamp(self.ban_ends_at, BAN_ENDS_AT)?;
        Ok(CreateBanRequest {
            user_id,
            banned_by,
            ban_type,
            ban_ends_at,
            reason,
        })
    }
}

/// Ban a user.
#[utoipa::path(
    post,
    path = "/api/ban-user",
    request_body = CreateBanBody,
    responses(
        (status = 201, description = "Ban recorded", body = BannedUserSchema),
        (status = 400, description = "Invalid request or self-ban", body = ErrorSchema),
        (status = 422, description = "Unknown users or moderator is not an admin", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "createBan"
)]
#[post("/ban-user")]
pub async fn create_ban(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBanBody>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_request()?;
    let ban = state.bans.create_ban(request).await?;
    Ok(HttpResponse::Created().json(ban))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiftBanBody {
    pub user_id: Option<String>,
    pub banned_by: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LiftBanResponse {
    #[schema(example = "ban has been lifted")]
    pub message: String,
}

/// Lift every active ban on a user.
#[utoipa::path(
    patch,
    path = "/api/ban-user/lift-ban",
    request_body = LiftBanBody,
    responses(
        (status = 200, description = "Ban lifted", body = LiftBanResponse),
        (status = 400, description = "user is not banned", body = ErrorSchema),
        (status = 422, description = "Moderator is not an admin", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "liftBan"
)]
#[patch("/ban-user/lift-ban")]
pub async fn lift_ban(
    state: web::Data<HttpState>,
    payload: web::Json<LiftBanBody>,
) -> ApiResult<web::Json<LiftBanResponse>> {
    let body = payload.into_inner();
    let request = LiftBanRequest {
        user_id: parse_user_id(body.user_id, USER_ID)?,
        banned_by: parse_user_id(body.banned_by, BANNED_BY)?,
    };
    state.bans.lift_ban(request).await?;
    Ok(web::Json(LiftBanResponse {
        message: "ban has been lifted".to_owned(),
    }))
}

/// Every ban ever issued against a user, newest first.
#[utoipa::path(
    get,
    path = "/api/ban-user/{userId}/history",
    params(("userId" = String, Path)),
    responses(
        (status = 200, description = "Ban records", body = [BannedUserSchema])
    ),
    tags = ["moderation"],
    operation_id = "banHistory"
)]
#[get("/ban-user/{user_id}/history")]
pub async fn ban_history(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BannedUser>>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    Ok(web::Json(state.bans.ban_history(&user_id).await?))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IsBannedResponse {
    pub is_banned: bool,
}

/// Whether a user has an active ban.
#[utoipa::path(
    get,
    path = "/api/ban-user/{userId}/is-banned",
    params(("userId" = String, Path)),
    responses(
        (status = 200, description = "Ban status", body = IsBannedResponse)
    ),
    tags = ["moderation"],
    operation_id = "isBanned"
)]
#[get("/ban-user/{user_id}/is-banned")]
pub async fn is_banned(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IsBannedResponse>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    let is_banned = state.bans.is_banned(&user_id).await?;
    Ok(web::Json(IsBannedResponse { is_banned }))
}
