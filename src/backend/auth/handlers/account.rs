/**
 * Account Handlers
 *
 * Endpoints that act on the signed-in user's own record: current user,
 * password change, account details, avatar and cover image.
 */

use axum::extract::State;

use crate::backend::auth::handlers::types::{ChangePasswordRequest, UpdateAccountRequest};
use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::JsonBody;
use crate::backend::media::{upload_required, MultipartForm};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::require_secret;
use crate::shared::models::{User, UserPatch};
use crate::shared::{ApiResponse, Empty};

async fn apply_patch(state: &AppState, user: &User, patch: UserPatch) -> Result<User, BackendError> {
    state
        .store
        .update_user(user.id, patch)
        .await?
        .ok_or_else(|| BackendError::not_found("User does not exist"))
}

/// GET /api/v1/users/current-user
pub async fn current_user(AuthUser(user): AuthUser) -> ApiResult<User> {
    Ok(ApiResponse::ok(user, "Current user fetched successfully"))
}

/// POST /api/v1/users/change-password
///
/// # Errors
///
/// * `400 Bad Request` - A field is missing or the old password does not match
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Empty> {
    let old_password = require_secret("oldPassword", request.old_password.as_deref().unwrap_or_default())?;
    let new_password = require_secret("newPassword", request.new_password.as_deref().unwrap_or_default())?;

    if !verify_password(&old_password, &user.password_hash)? {
        tracing::warn!("Invalid old password for user: {}", user.username);
        return Err(BackendError::bad_request("Invalid old password"));
    }

    let password_hash = hash_password(&new_password, state.config.bcrypt_cost)?;
    apply_patch(&state, &user, UserPatch::password_hash(password_hash)).await?;

    tracing::info!("Password changed for user: {}", user.username);
    Ok(ApiResponse::ok(Empty {}, "Password changed successfully"))
}

/// PATCH /api/v1/users/update-account
///
/// # Errors
///
/// * `400 Bad Request` - `fullname` or `email` missing, or the email is malformed
/// * `409 Conflict` - The email belongs to another user
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<UpdateAccountRequest>,
) -> ApiResult<User> {
    let patch = UserPatch::account(
        request.fullname.as_deref().unwrap_or_default(),
        request.email.as_deref().unwrap_or_default(),
    )?;
    let user = apply_patch(&state, &user, patch).await?;

    tracing::info!("Account details updated for user: {}", user.username);
    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

/// PATCH /api/v1/users/avatar (multipart field `avatar`)
pub async fn update_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut form: MultipartForm,
) -> ApiResult<User> {
    let avatar = upload_required(
        state.media.as_ref(),
        form.take_file("avatar"),
        "Avatar file is missing",
        "Error while uploading avatar",
    )
    .await?;
    let user = apply_patch(&state, &user, UserPatch::avatar(avatar.url)).await?;

    tracing::info!("Avatar updated for user: {}", user.username);
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

/// PATCH /api/v1/users/cover-image (multipart field `coverImage`)
pub async fn update_cover_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut form: MultipartForm,
) -> ApiResult<User> {
    let cover = upload_required(
        state.media.as_ref(),
        form.take_file("coverImage"),
        "Cover image file is missing",
        "Error while uploading cover image",
    )
    .await?;
    let user = apply_patch(&state, &user, UserPatch::cover_image(cover.url)).await?;

    tracing::info!("Cover image updated for user: {}", user.username);
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}
