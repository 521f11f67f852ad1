//! Video-info handlers.
//!
//! ```text
//! GET    /api/video-info/{url}   url is percent-encoded
//! GET    /api/video-list
//! POST   /api/video-info {"url":"https://...","duration":12.5,"screenshot":"/images/a.png"}
//! DELETE /api/video-info/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewVideo;
use crate::domain::{Error, Video, VideoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, VideoSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_uuid_error, invalid_value_error, missing_field_error, require,
};

const URL: FieldName = FieldName::new("url");
const DURATION: FieldName = FieldName::new("duration");
const VIDEO_ID: FieldName = FieldName::new("id");

/// Duration and screenshot for one URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoInfoResponse {
    /// Length in seconds.
    pub duration: f64,
    #[schema(example = "/images/0b9d6a34-62f4-4bb4-8f6c-6f3c1a2f9c11.png")]
    pub screenshot: Option<String>,
}

/// Inspect a video URL for its duration and a screenshot.
#[utoipa::path(
    get,
    path = "/api/video-info/{url}",
    params(("url" = String, Path, description = "Percent-encoded video URL")),
    responses(
        (status = 200, description = "Video details", body = VideoInfoResponse),
        (status = 500, description = "Failed to process video", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "getVideoInfo"
)]
#[get("/video-info/{url}")]
pub async fn video_info(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VideoInfoResponse>> {
    let url = require(Some(path.into_inner()), URL)?;
    let video = state.videos.inspect(&url).await?;
    Ok(web::Json(VideoInfoResponse {
        duration: video.duration,
        screenshot: video.screenshot,
    }))
}

/// Every stored video record, oldest first.
#[utoipa::path(
    get,
    path = "/api/video-list",
    responses((status = 200, description = "Video records", body = [VideoSchema])),
    tags = ["videos"],
    operation_id = "listVideos"
)]
#[get("/video-list")]
pub async fn video_list(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Video>>> {
    Ok(web::Json(state.videos.list().await?))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VideoBody {
    #[schema(example = "https://lvpr.tv/?v=542dr3uvnpn4ds52")]
    pub url: Option<String>,
    /// Length in seconds.
    pub duration: Option<f64>,
    pub screenshot: Option<String>,
}

impl VideoBody {
    fn into_request(self) -> Result<NewVideo, Error> {
        let url = require(self.url, URL)?;
        let duration = self.duration.ok_or_else(|| missing_field_error(DURATION))?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(invalid_value_error(
                DURATION,
                "duration must be a non-negative number of seconds",
                &duration.to_string(),
            ));
        }
        Ok(NewVideo {
            url,
            duration,
            screenshot: self.screenshot,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoCreatedResponse {
    #[schema(example = "Video created")]
    pub message: String,
    #[schema(value_type = VideoSchema)]
    pub video_info: Video,
}

/// Record caller-supplied video details.
#[utoipa::path(
    post,
    path = "/api/video-info",
    request_body = VideoBody,
    responses(
        (status = 201, description = "Video created", body = VideoCreatedResponse),
        (status = 400, description = "url or duration missing", body = ErrorSchema),
        (status = 409, description = "URL already stored", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "createVideo"
)]
#[post("/video-info")]
pub async fn create_video(
    state: web::Data<HttpState>,
    payload: web::Json<VideoBody>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_request()?;
    let video = state.videos.create(request).await?;
    Ok(HttpResponse::Created().json(VideoCreatedResponse {
        message: "Video created".to_owned(),
        video_info: video,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoDeletedResponse {
    #[schema(example = "Video deleted")]
    pub message: String,
    #[schema(value_type = VideoSchema)]
    pub video: Video,
}

/// Delete a video record.
#[utoipa::path(
    delete,
    path = "/api/video-info/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Video deleted", body = VideoDeletedResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    tags = ["videos"],
    operation_id = "deleteVideo"
)]
#[delete("/video-info/{id}")]
pub async fn delete_video(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VideoDeletedResponse>> {
    let raw = path.into_inner();
    let id = VideoId::parse(&raw).map_err(|_| invalid_uuid_error(VIDEO_ID, &raw))?;
    let video = state.videos.delete(&id).await?;
    Ok(web::Json(VideoDeletedResponse {
        message: "Video deleted".to_owned(),
        video,
    }))
}
