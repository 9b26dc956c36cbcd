/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It reads the access token from the `accessToken`
 * cookie, or failing that from an `Authorization: Bearer` header, verifies
 * it, and loads the user it names.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::ACCESS_COOKIE;
use crate::backend::auth::sessions::subject_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::models::User;

/// Authenticated user loaded by the middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Access token from the cookie jar, else from a Bearer header
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the access token (cookie first, then Bearer header)
/// 2. Verifies the token
/// 3. Loads the user named by the token's subject
/// 4. Attaches the user to request extensions for use in handlers
///
/// Returns a 401 envelope if the token is missing, invalid or expired, or
/// names a user that no longer exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = access_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing access token");
        BackendError::unauthorized("Unauthorized request")
    })?;

    let claims = app_state.tokens.verify_access_token(&token).map_err(|e| {
        tracing::warn!("Invalid access token: {:?}", e);
        BackendError::unauthorized("Invalid access token")
    })?;

    let user_id = subject_id(&claims.sub).map_err(|e| {
        tracing::warn!("{}", e);
        BackendError::unauthorized("Invalid access token")
    })?;

    let user = app_state.store.find_user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for unknown user {}", user_id);
        BackendError::unauthorized("Invalid access token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`; elsewhere it rejects with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticated = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Unauthorized request")
            })?;

        Ok(AuthUser(authenticated.user))
    }
}
