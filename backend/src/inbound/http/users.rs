//! User account and preference handlers.
//!
//! ```text
//! POST  /api/user {"userId":"BC1YL..."}
//! GET   /api/users/{userId}
//! PATCH /api/users/{userId} {"accounts":[{"name":"vimeo","isSynced":true}],"accessToken":null}
//! GET   /api/users/{userId}/preferences
//! PATCH /api/users/{userId}/preferences {"preferences":["<hashtag uuid>"]}
//! ```

use std::collections::HashSet;
use std::str::FromStr;

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{UpdateUserRequest, UserProfile};
use crate::domain::{AccountName, AccountUpdate, Error, Hashtag, HashtagId, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, parse_user_id,
};

const USER_ID: FieldName = FieldName::new("userId");
const ACCOUNTS: FieldName = FieldName::new("accounts");
const PREFERENCES: FieldName = FieldName::new("preferences");

/// Linked account as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "youtube")]
    pub name: String,
    pub is_synced: bool,
}

/// A preferred hashtag, dereferenced.
#[derive(Debug, Serialize, ToSchema)]
pub struct PreferenceResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: HashtagId,
    #[schema(example = "travel")]
    pub name: String,
}

impl From<Hashtag> for PreferenceResponse {
    fn from(tag: Hashtag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// User representation with preferences resolved to names.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "BC1YLexample")]
    pub user_id: String,
    pub accounts: Vec<AccountResponse>,
    pub access_token: Option<String>,
    #[schema(example = json!(["user"]))]
    pub roles: Vec<String>,
    pub preferences: Vec<PreferenceResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    fn from_parts(user: User, preferences: Vec<Hashtag>) -> Self {
        Self {
            user_id: user.user_id.into(),
            accounts: user
                .accounts
                .into_iter()
                .map(|account| AccountResponse {
                    name: account.name.as_str().to_owned(),
                    is_synced: account.is_synced,
                })
                .collect(),
            access_token: user.access_token,
            roles: user
                .roles
                .into_iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            preferences: preferences.into_iter().map(PreferenceResponse::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self::from_parts(profile.user, profile.preferences)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[schema(example = "BC1YLexample")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserResponse,
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "User ID is not provided", body = ErrorSchema),
        (status = 409, description = "User already exists", body = ErrorSchema),
        (status = 500, description = "Failed to create user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(payload.into_inner().user_id, USER_ID)?;
    let user = state.users.create_user(user_id).await?;
    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "User created successfully".to_owned(),
        user: UserResponse::from_parts(user, Vec::new()),
    }))
}

/// Fetch a user with preferences resolved.
#[utoipa::path(
    get,
    path = "/api/users/{userId}",
    params(("userId" = String, Path, description = "External user id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    Ok(web::Json(state.users.get_user(&user_id).await?.into()))
}

/// Partial user update. An explicit `null` access token clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    /// Objects of the form `{"name": "youtube" | "vimeo", "isSynced"?: bool}`.
    #[schema(value_type = Option<Vec<Object>>)]
    pub accounts: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub access_token: Option<Option<String>>,
}

/// Distinguish an absent field from an explicit `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_account_updates(raw: Vec<Value>) -> Result<Vec<AccountUpdate>, Error> {
    let mut seen = HashSet::new();
    let mut updates = Vec::with_capacity(raw.len());
    for item in raw {
        let Some(object) = item.as_object() else {
            return Err(invalid_value_error(
                ACCOUNTS,
                "Each item in accounts should be an object",
                &item.to_string(),
            ));
        };
        let Some(name) = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            return Err(invalid_value_error(
                ACCOUNTS,
                "Account name should be a string and is required",
                &item.to_string(),
            ));
        };
        if !seen.insert(name.to_owned()) {
            return Err(invalid_value_error(
                ACCOUNTS,
                &format!("Account name \"{name}\" should be unique"),
                name,
            ));
        }
        let is_synced = match object.get("isSynced") {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(other) => {
                return Err(invalid_value_error(
                    ACCOUNTS,
                    "Account isSynced should be a boolean",
                    &other.to_string(),
                ));
            }
        };
        let name = AccountName::from_str(name)
            .map_err(|err| invalid_value_error(ACCOUNTS, &err.to_string(), name))?;
        updates.push(AccountUpdate { name, is_synced });
    }
    Ok(updates)
}

/// Update linked accounts and the access token.
#[utoipa::path(
    patch,
    path = "/api/users/{userId}",
    params(("userId" = String, Path, description = "External user id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid accounts", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Failed to update user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    let body = payload.into_inner();
    let accounts = body.accounts.map(parse_account_updates).transpose()?;
    let profile = state
        .users
        .update_user(UpdateUserRequest {
            user_id,
            accounts,
            access_token: body.access_token,
        })
        .await?;
    Ok(web::Json(profile.into()))
}

/// The user's preferred hashtags, strongest first.
#[utoipa::path(
    get,
    path = "/api/users/{userId}/preferences",
    params(("userId" = String, Path, description = "External user id")),
    responses(
        (status = 200, description = "Preferences", body = [PreferenceResponse]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserPreferences"
)]
#[get("/users/{user_id}/preferences")]
pub async fn get_preferences(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PreferenceResponse>>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    let preferences = state.users.preferences(&user_id).await?;
    Ok(web::Json(
        preferences.into_iter().map(PreferenceResponse::from).collect(),
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreferencesBody {
    /// Hashtag ids; unknown or malformed ids are dropped.
    pub preferences: Option<Vec<String>>,
}

/// Replace the user's preferred hashtags.
#[utoipa::path(
    patch,
    path = "/api/users/{userId}/preferences",
    params(("userId" = String, Path, description = "External user id")),
    request_body = UpdatePreferencesBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "preferences missing", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserPreferences"
)]
#[patch("/users/{user_id}/preferences")]
pub async fn update_preferences(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePreferencesBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(Some(path.into_inner()), USER_ID)?;
    let raw_ids = payload
        .into_inner()
        .preferences
        .ok_or_else(|| missing_field_error(PREFERENCES))?;
    let profile = state.users.update_preferences(&user_id, raw_ids).await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
mod tests;
