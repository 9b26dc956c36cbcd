/**
 * Session Management and JWT Tokens
 *
 * This module handles access and refresh token generation and validation.
 *
 * Access and refresh tokens are signed with separate secrets and carry
 * separate lifetimes. A refresh token is only honoured while it matches the
 * one stored on the user, so issuing a new pair revokes the previous one.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::server::config::ServerConfig;
use crate::shared::models::User;

/// Access token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub username: String,
    pub fullname: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Refresh token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID
    pub sub: String,
    /// Unique per issue so two refresh tokens minted in the same second differ
    pub jti: String,
    pub exp: u64,
    pub iat: u64,
}

/// A freshly issued access/refresh pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing and verification keys for both token kinds
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    refresh_ttl_secs: u64,
}

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

impl TokenKeys {
    pub fn new(access_secret: &str, access_ttl_secs: u64, refresh_secret: &str, refresh_ttl_secs: u64) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            access_ttl_secs,
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            &config.access_token_secret,
            config.access_token_ttl_secs,
            &config.refresh_token_secret,
            config.refresh_token_ttl_secs,
        )
    }

    /// Create an access token for a user
    pub fn create_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            exp: iat + self.access_ttl_secs,
            iat,
        };
        encode(&Header::default(), &claims, &self.access_encoding)
    }

    /// Create a refresh token for a user
    pub fn create_refresh_token(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: iat + self.refresh_ttl_secs,
            iat,
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: self.create_access_token(user)?,
            refresh_token: self.create_refresh_token(user.id)?,
        })
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        Ok(decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?.claims)
    }

    /// Verify and decode a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
        Ok(decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?.claims)
    }
}

/// Parse the user id out of a token subject
pub fn subject_id(sub: &str) -> Result<Uuid, String> {
    Uuid::parse_str(sub).map_err(|e| format!("Invalid user ID in token: {}", e))
}
