/**
 * User Handler Types
 *
 * Request and response bodies for the `/users` endpoints. Request fields are
 * optional at the serde level so a missing field is reported through the
 * error envelope with the field named, not as a deserialization failure.
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::User;

/// Login request
///
/// Either `email` or `username` identifies the account.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login and refresh response
///
/// The tokens are also set as cookies; they are repeated here for clients
/// that send them as `Authorization: Bearer` instead.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Signed-in user, present on login only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request; the cookie takes precedence when both are sent
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}
