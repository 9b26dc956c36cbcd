//! Comment HTTP Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::aggregate::{recipes, CommentWithOwner};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::{parse_id, OptionalJsonBody};
use crate::backend::middleware::AuthUser;
use crate::backend::pagination::{Page, PageQuery, COMMENTS};
use crate::backend::server::state::AppState;
use crate::shared::models::{Comment, NewComment};
use crate::shared::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    pub content: Option<String>,
}

/// `newcontent` is accepted as an alias of `content`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
    pub newcontent: Option<String>,
}

/// Load a comment and check that `user_id` wrote it
async fn owned_comment(
    state: &AppState,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<Comment, BackendError> {
    let comment = state
        .store
        .find_comment_by_id(comment_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    if !comment.is_owned_by(user_id) {
        tracing::warn!("User {} tried to modify comment {}", user_id, comment.id);
        return Err(BackendError::forbidden("This is not your comment"));
    }
    Ok(comment)
}

/// Comments on a video, newest first, ten per page by default
pub async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<CommentWithOwner>> {
    let video_id = parse_id(&video_id, "video")?;
    let request = COMMENTS.resolve(&query);
    let comments = recipes::comments_for_video(state.store.as_ref(), video_id, request).await;
    let page = COMMENTS.paginate(comments, request)?;
    Ok(ApiResponse::ok(page, "Comments fetched successfully"))
}

/// Comment on a video
///
/// # Errors
///
/// * `400 Bad Request` - No body or no `content` in it, or it is blank
/// * `404 Not Found` - The video does not exist
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
    OptionalJsonBody(request): OptionalJsonBody<AddCommentRequest>,
) -> ApiResult<Comment> {
    let video_id = parse_id(&video_id, "video")?;
    let content = request
        .content
        .ok_or_else(|| BackendError::bad_request("Error while getting the content from body"))?;

    if state.store.find_video_by_id(video_id).await?.is_none() {
        return Err(BackendError::not_found("Video not found"));
    }
    if content.trim().is_empty() {
        return Err(BackendError::bad_request("Cannot post an empty comment"));
    }

    let comment = state
        .store
        .create_comment(NewComment::new(&content, video_id, user.id)?)
        .await?;

    tracing::info!("Comment {} added to video {} by {}", comment.id, video_id, user.username);
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// Edit a comment; author only
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
    OptionalJsonBody(request): OptionalJsonBody<UpdateCommentRequest>,
) -> ApiResult<Comment> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let content = request
        .content
        .or(request.newcontent)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| BackendError::bad_request("Content field is mandatory"))?;

    owned_comment(&state, comment_id, user.id).await?;
    let comment = state
        .store
        .update_comment(comment_id, content)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;

    tracing::info!("Comment {} updated by {}", comment.id, user.username);
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// Delete a comment; author only. Others get 403 and the comment stays.
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
) -> ApiResult<Comment> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let comment = owned_comment(&state, comment_id, user.id).await?;

    if !state.store.delete_comment(comment_id).await? {
        return Err(BackendError::not_found("Comment not found"));
    }

    tracing::info!("Comment {} deleted by {}", comment_id, user.username);
    Ok(ApiResponse::ok(comment, "Comment deleted successfully"))
}
