//! Hashtag listing and backfill handlers.
//!
//! ```text
//! GET  /api/hashtags/top
//! GET  /api/hashtags?limit=20
//! POST /api/migrate-hashtags
//! ```

use actix_web::{get, post, web};
use pagination::{DEFAULT_LIMIT, parse_limit};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Hashtag, HashtagCount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, HashtagCountSchema, HashtagSchema};
use crate::inbound::http::state::HttpState;

/// Most frequent post hashtags.
#[utoipa::path(
    get,
    path = "/api/hashtags/top",
    responses(
        (status = 200, description = "Hashtags with occurrence counts", body = [HashtagCountSchema]),
        (status = 500, description = "Failed to get top hashtags", body = ErrorSchema)
    ),
    tags = ["hashtags"],
    operation_id = "getTopHashtags"
)]
#[get("/hashtags/top")]
pub async fn top_hashtags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<HashtagCount>>> {
    Ok(web::Json(state.hashtags.top_hashtags().await?))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HashtagListParams {
    /// Page size; invalid values select 20.
    pub limit: Option<String>,
}

/// Stored hashtags, least used first, explicit words excluded.
#[utoipa::path(
    get,
    path = "/api/hashtags",
    params(HashtagListParams),
    responses(
        (status = 200, description = "Hashtags", body = [HashtagSchema]),
        (status = 500, description = "Failed to get hashtags", body = ErrorSchema)
    ),
    tags = ["hashtags"],
    operation_id = "getHashtags"
)]
#[get("/hashtags")]
pub async fn list_hashtags(
    state: web::Data<HttpState>,
    params: web::Query<HashtagListParams>,
) -> ApiResult<web::Json<Vec<Hashtag>>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_LIMIT);
    Ok(web::Json(state.hashtags.hashtags_by_usage(limit).await?))
}

/// Backfill outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct MigrateHashtagsResponse {
    #[schema(example = "done")]
    pub message: String,
    /// Hashtag documents created or incremented.
    pub count: u64,
}

/// Create or increment hashtag documents from every stored post.
#[utoipa::path(
    post,
    path = "/api/migrate-hashtags",
    responses(
        (status = 200, description = "Backfill finished", body = MigrateHashtagsResponse),
        (status = 500, description = "Failed to migrate hashtags", body = ErrorSchema)
    ),
    tags = ["hashtags"],
    operation_id = "migrateHashtags"
)]
#[post("/migrate-hashtags")]
pub async fn migrate_hashtags(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<MigrateHashtagsResponse>> {
    let count = state.hashtags.migrate_hashtags().await?;
    Ok(web::Json(MigrateHashtagsResponse {
        message: "done".to_owned(),
        count,
    }))
}
