//! Feed, suggestion and ingestion-trigger handlers.
//!
//! ```text
//! GET  /api/posts?page=1&limit=10&userId=U1&hashtag=travel&moment=true&sort_by=most_liked
//! POST /api/posts
//! POST /api/suggestions?title=sunset%20beach
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::{parse_limit, parse_page};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Post;
use crate::domain::feed::{FeedPage, FeedSort};
use crate::domain::ports::FeedRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FeedPageSchema, PostSchema};
use crate::inbound::http::state::HttpState;

/// Page size used when `limit` is absent or not a number.
pub const FEED_FALLBACK_LIMIT: u32 = 10;

/// Raw feed query parameters; every value is optional and loosely typed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    /// 1-based page; invalid values select page 1.
    pub page: Option<String>,
    /// Page size, clamped to 100.
    pub limit: Option<String>,
    /// Personalise the first pass with this user's preferences.
    #[serde(rename = "userId")]
    #[param(rename = "userId")]
    pub user_id: Option<String>,
    /// Single hashtag without `#`.
    pub hashtag: Option<String>,
    /// Free text for related-content search.
    pub related_of: Option<String>,
    /// `true` selects short-form moments.
    pub moment: Option<String>,
    /// `latest`, `most_liked` or `most_commented`.
    pub sort_by: Option<String>,
}

impl FeedParams {
    fn into_request(self) -> FeedRequest {
        FeedRequest {
            page: parse_page(self.page.as_deref()),
            limit: parse_limit(self.limit.as_deref(), FEED_FALLBACK_LIMIT),
            user_id: self.user_id.filter(|id| !id.trim().is_empty()),
            hashtag: self.hashtag,
            related_of: self.related_of.filter(|text| !text.trim().is_empty()),
            sort: FeedSort::from_query(self.sort_by.as_deref()),
            moment: self.moment,
        }
    }
}

/// Read one feed page.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(FeedParams),
    responses(
        (status = 200, description = "Feed page", body = FeedPageSchema),
        (status = 500, description = "Failed to get posts", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPosts"
)]
#[get("/posts")]
pub async fn get_posts(
    state: web::Data<HttpState>,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<FeedPage>> {
    let page = state.feed.feed(params.into_inner().into_request()).await?;
    Ok(web::Json(page))
}

/// Result of a manual ingestion run.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = "3 new posts have been created.")]
    pub message: String,
    /// Posts created by this run; omitted when nothing was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<PostSchema>>)]
    pub results: Option<Vec<Post>>,
}

impl IngestResponse {
    fn from_created(created: Vec<Post>) -> Self {
        if created.is_empty() {
            Self {
                message: "No new videos found to create screenshots.".to_owned(),
                results: None,
            }
        } else {
            Self {
                message: format!("{} new posts have been created.", created.len()),
                results: Some(created),
            }
        }
    }
}

/// Run ingestion once.
#[utoipa::path(
    post,
    path = "/api/posts",
    responses(
        (status = 201, description = "Run finished", body = IngestResponse),
        (status = 409, description = "A run is already in progress", body = ErrorSchema),
        (status = 500, description = "Failed to create post", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPosts"
)]
#[post("/posts")]
pub async fn create_posts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let report = state.ingestion.ingest().await?;
    Ok(HttpResponse::Created().json(IngestResponse::from_created(report.created)))
}

/// Suggestion query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionParams {
    /// Title whose words drive the search.
    pub title: Option<String>,
}

/// Posts related to a title.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    #[schema(value_type = Vec<PostSchema>)]
    pub related_posts: Vec<Post>,
}

/// Up to five non-moment posts sharing words with `title`.
#[utoipa::path(
    post,
    path = "/api/suggestions",
    params(SuggestionParams),
    responses(
        (status = 200, description = "Related posts", body = SuggestionsResponse),
        (status = 500, description = "Failed to get posts", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPostSuggestions"
)]
#[post("/suggestions")]
pub async fn get_suggestions(
    state: web::Data<HttpState>,
    params: web::Query<SuggestionParams>,
) -> ApiResult<web::Json<SuggestionsResponse>> {
    let title = params.into_inner().title.unwrap_or_default();
    let related_posts = state.feed.suggestions(&title).await?;
    Ok(web::Json(SuggestionsResponse { related_posts }))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
