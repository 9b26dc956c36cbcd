//! Video HTTP Handlers
//!
//! Listing, publishing, watching and owner-only maintenance of videos.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::aggregate::{recipes, VideoWithOwner};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::{parse_id, JsonBody};
use crate::backend::media::{upload_required, MultipartForm};
use crate::backend::middleware::AuthUser;
use crate::backend::pagination::{Page, PageQuery, VIDEOS};
use crate::backend::server::state::AppState;
use crate::shared::error::require_non_blank;
use crate::shared::models::{
    NewVideo, SortDirection, Video, VideoListQuery, VideoPatch, VideoSortField,
};
use crate::shared::ApiResponse;

/// Query string of `GET /videos`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl VideoListParams {
    fn list_query(&self) -> VideoListQuery {
        VideoListQuery {
            text: self.query.clone().unwrap_or_default(),
            sort_by: VideoSortField::parse(self.sort_by.as_deref()),
            direction: SortDirection::parse(self.sort_type.as_deref()),
        }
    }

    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// Load a video and check that `user_id` owns it
async fn owned_video(state: &AppState, video_id: Uuid, user_id: Uuid) -> Result<Video, BackendError> {
    let video = state
        .store
        .find_video_by_id(video_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Video not found"))?;
    if video.owner_id != user_id {
        tracing::warn!(
            "User {} tried to modify video {} owned by {}",
            user_id,
            video.id,
            video.owner_id
        );
        return Err(BackendError::forbidden("This video is not published by you"));
    }
    Ok(video)
}

/// Paginated search over all videos with their owners
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<VideoListParams>,
) -> ApiResult<Page<VideoWithOwner>> {
    let request = VIDEOS.resolve(&params.page_query());
    let videos = recipes::video_list(state.store.as_ref(), &params.list_query(), request).await;
    let page = VIDEOS.paginate(videos, request)?;

    let message = if page.total == 0 {
        "No videos found"
    } else {
        "Videos fetched successfully"
    };
    Ok(ApiResponse::ok(page, message))
}

/// Publish a video (multipart: `title`, `description`, `videoFile`, `thumbnail`)
///
/// # Errors
///
/// * `400 Bad Request` - A text field or file is missing, or an upload failed
pub async fn publish_video(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut form: MultipartForm,
) -> ApiResult<Video> {
    let title = require_non_blank("title", form.text("title").unwrap_or_default())?;
    let description = require_non_blank("description", form.text("description").unwrap_or_default())?;

    let video_file = form.take_file("videoFile");
    let thumbnail = form.take_file("thumbnail");
    if video_file.is_none() {
        return Err(BackendError::bad_request("Video file is required"));
    }
    if thumbnail.is_none() {
        return Err(BackendError::bad_request("Thumbnail is required"));
    }

    let media = state.media.as_ref();
    let uploaded_video =
        upload_required(media, video_file, "Video file is required", "Error while uploading video")
            .await?;
    let uploaded_thumbnail =
        upload_required(media, thumbnail, "Thumbnail is required", "Error while uploading thumbnail")
            .await?;

    let new_video = NewVideo::new(
        &title,
        &description,
        uploaded_video.url,
        uploaded_thumbnail.url,
        uploaded_video.duration,
        user.id,
    )?;
    let video = state.store.create_video(new_video).await?;

    tracing::info!("Video {} published by {}", video.id, user.username);
    Ok(ApiResponse::created(video, "Video uploaded and published successfully"))
}

/// Fetch a video with its owner and record the watch.
///
/// The view counter only moves the first time a user watches a video.
pub async fn get_video(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<VideoWithOwner> {
    let video_id = parse_id(&video_id, "video")?;
    if state.store.find_video_by_id(video_id).await?.is_none() {
        return Err(BackendError::not_found("Video not found"));
    }

    if state.store.push_watch_history(user.id, video_id).await? {
        state.store.increment_video_views(video_id).await?;
        tracing::debug!("First watch of {} by {}", video_id, user.username);
    }

    let video = recipes::video_with_owner(state.store.as_ref(), video_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Video not found"))?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// Update title, description or thumbnail; owner only
pub async fn update_video(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
    JsonBody(request): JsonBody<UpdateVideoRequest>,
) -> ApiResult<Video> {
    let video_id = parse_id(&video_id, "video")?;
    let patch = VideoPatch::metadata(
        request.title.as_deref(),
        request.description.as_deref(),
        request.thumbnail.as_deref(),
    )?;
    owned_video(&state, video_id, user.id).await?;

    let video = state
        .store
        .update_video(video_id, patch)
        .await?
        .ok_or_else(|| BackendError::not_found("Video not found"))?;

    tracing::info!("Video {} updated by {}", video.id, user.username);
    Ok(ApiResponse::ok(video, "Video details updated successfully"))
}

/// Delete a video; owner only. Also drops it from the caller's watch history.
pub async fn delete_video(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<Video> {
    let video_id = parse_id(&video_id, "video")?;
    let video = owned_video(&state, video_id, user.id).await?;

    if !state.store.delete_video(video_id).await? {
        return Err(BackendError::not_found("Video not found"));
    }
    state.store.remove_from_watch_history(user.id, video_id).await?;

    tracing::info!("Video {} deleted by {}", video_id, user.username);
    Ok(ApiResponse::ok(video, "Video deleted successfully"))
}

/// Flip `isPublished`; owner only
pub async fn toggle_publish_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<Video> {
    let video_id = parse_id(&video_id, "video")?;
    let video = owned_video(&state, video_id, user.id).await?;

    let video = state
        .store
        .update_video(video_id, VideoPatch::published(!video.is_published))
        .await?
        .ok_or_else(|| BackendError::not_found("Video not found"))?;

    tracing::info!("Video {} published={}", video.id, video.is_published);
    Ok(ApiResponse::ok(video, "Publish status changed successfully"))
}

/// Every video uploaded by `userId`, owner joined
pub async fn user_videos(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<VideoWithOwner>> {
    let user_id = parse_id(&user_id, "user")?;
    let videos = recipes::videos_by_owner(state.store.as_ref(), user_id).await?;
    Ok(ApiResponse::ok(videos, "User's uploaded videos fetched successfully"))
}
