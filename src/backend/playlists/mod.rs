//! Playlists
//!
//! Routes under `/api/v1/playlists`. Reading is public; every mutation is
//! restricted to the playlist's owner. A playlist's `duration` tracks the sum
//! of its videos' durations as they are added and removed.

use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::aggregate::{recipes, PlaylistWithVideos};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::{parse_id, JsonBody};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{NewPlaylist, Playlist, PlaylistPatch};
use crate::shared::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

async fn owned_playlist(
    state: &AppState,
    playlist_id: Uuid,
    user_id: Uuid,
) -> Result<Playlist, BackendError> {
    let playlist = state
        .store
        .find_playlist_by_id(playlist_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Playlist not found"))?;
    if !playlist.is_owned_by(user_id) {
        tracing::warn!("User {} tried to modify playlist {}", user_id, playlist.id);
        return Err(BackendError::forbidden("This playlist is not owned by you"));
    }
    Ok(playlist)
}

fn updated(playlist: Option<Playlist>) -> Result<Playlist, BackendError> {
    playlist.ok_or_else(|| BackendError::not_found("Playlist not found"))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<PlaylistRequest>,
) -> ApiResult<Playlist> {
    let new_playlist = NewPlaylist::new(
        request.name.as_deref().unwrap_or_default(),
        request.description.as_deref().unwrap_or_default(),
        user.id,
    )?;
    let playlist = state.store.create_playlist(new_playlist).await?;

    tracing::info!("Playlist {} created by {}", playlist.id, user.username);
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// Playlist with its videos in playlist order
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> ApiResult<PlaylistWithVideos> {
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    let playlist = recipes::playlist_with_videos(state.store.as_ref(), playlist_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Playlist not found"))?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(playlist_id): Path<String>,
    JsonBody(request): JsonBody<PlaylistRequest>,
) -> ApiResult<Playlist> {
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    let patch = PlaylistPatch::new(request.name.as_deref(), request.description.as_deref())?;
    owned_playlist(&state, playlist_id, user.id).await?;

    let playlist = updated(state.store.update_playlist(playlist_id, patch).await?)?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(playlist_id): Path<String>,
) -> ApiResult<Playlist> {
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    let playlist = owned_playlist(&state, playlist_id, user.id).await?;

    if !state.store.delete_playlist(playlist_id).await? {
        return Err(BackendError::not_found("Playlist not found"));
    }

    tracing::info!("Playlist {} deleted by {}", playlist_id, user.username);
    Ok(ApiResponse::ok(playlist, "Playlist deleted successfully"))
}

/// PATCH /add/{videoId}/{playlistId}; adding a video twice is a no-op
pub async fn add_video_to_playlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> ApiResult<Playlist> {
    let video_id = parse_id(&video_id, "video")?;
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    owned_playlist(&state, playlist_id, user.id).await?;

    let video = state
        .store
        .find_video_by_id(video_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Video not found"))?;

    let playlist = updated(
        state
            .store
            .add_video_to_playlist(playlist_id, video_id, video.duration)
            .await?,
    )?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

/// PATCH /remove/{videoId}/{playlistId}
///
/// A video deleted since it was added can still be removed; its duration is
/// no longer known, so the playlist total is left as is.
pub async fn remove_video_from_playlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> ApiResult<Playlist> {
    let video_id = parse_id(&video_id, "video")?;
    let playlist_id = parse_id(&playlist_id, "playlist")?;
    owned_playlist(&state, playlist_id, user.id).await?;

    let duration = state
        .store
        .find_video_by_id(video_id)
        .await?
        .map(|video| video.duration)
        .unwrap_or(0.0);

    let playlist = updated(
        state
            .store
            .remove_video_from_playlist(playlist_id, video_id, duration)
            .await?,
    )?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}

/// Playlists owned by `userId`
pub async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Playlist>> {
    let user_id = parse_id(&user_id, "user")?;
    let playlists = state.store.find_playlists_by_owner(user_id).await?;
    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}
