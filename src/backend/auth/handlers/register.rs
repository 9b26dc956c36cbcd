/**
 * Registration Handler
 *
 * This module implements the user registration handler for POST /api/v1/users/register.
 *
 * # Registration Process
 *
 * 1. Validate the text fields (all required)
 * 2. Check that neither the username nor the email is taken
 * 3. Upload the avatar (required) and cover image (optional)
 * 4. Hash the password and create the user
 *
 * # Security
 *
 * - Passwords are hashed using bcrypt with the configured cost
 * - The password hash and refresh token are never serialized
 */

use axum::extract::State;

use crate::backend::auth::password::hash_password;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::media::{upload_required, upload_staged, MultipartForm};
use crate::backend::server::state::AppState;
use crate::shared::error::{require_non_blank, require_secret};
use crate::shared::models::user::normalize_email;
use crate::shared::models::{NewUser, User};
use crate::shared::ApiResponse;

/// Register handler
///
/// Multipart fields: `fullname`, `email`, `username`, `password`, `avatar`
/// (file), `coverImage` (file, optional).
///
/// # Errors
///
/// * `400 Bad Request` - A field is missing, or the avatar is missing or failed to upload
/// * `409 Conflict` - The username or email is already taken
/// * `500 Internal Server Error` - Password hashing or persistence fails
pub async fn register(State(state): State<AppState>, mut form: MultipartForm) -> ApiResult<User> {
    let fullname = require_non_blank("fullname", form.text("fullname").unwrap_or_default())?;
    let email = normalize_email(form.text("email").unwrap_or_default())?;
    let username = require_non_blank("username", form.text("username").unwrap_or_default())?.to_lowercase();
    let password = require_secret("password", form.text("password").unwrap_or_default())?;
    tracing::info!("Register request for username: {}, email: {}", username, email);

    if state
        .store
        .find_user_by_username_or_email(&username, &email)
        .await?
        .is_some()
    {
        tracing::warn!("Username or email already taken: {} / {}", username, email);
        return Err(BackendError::conflict("Someone with this username/email already exists"));
    }

    let avatar = upload_required(
        state.media.as_ref(),
        form.take_file("avatar"),
        "Avatar file is required",
        "Avatar file is required",
    )
    .await?;
    let cover_image = match form.take_file("coverImage") {
        Some(staged) => upload_staged(state.media.as_ref(), staged).await.map(|m| m.url),
        None => None,
    };

    let password_hash = hash_password(&password, state.config.bcrypt_cost)?;
    let new_user = NewUser::new(&fullname, &email, &username, password_hash, avatar.url, cover_image)?;
    let user = state.store.create_user(new_user).await?;

    tracing::info!("User registered: {} ({})", user.username, user.id);
    Ok(ApiResponse::created(user, "User registered successfully"))
}
