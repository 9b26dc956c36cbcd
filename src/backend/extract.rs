/**
 * Request Extractors
 *
 * Thin wrappers over axum's extractors whose rejections render as the
 * error envelope instead of axum's plain-text bodies.
 */

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::backend::error::BackendError;

/// JSON body; any rejection becomes a 400 envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// JSON body that may be left out entirely.
///
/// A request without a JSON content type yields `T::default()`, so the
/// handler reports the missing field itself. A malformed JSON body is
/// still a 400 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJsonBody<T>(pub T);

impl<T, S> FromRequest<S> for OptionalJsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(OptionalJsonBody(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(OptionalJsonBody(T::default())),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> BackendError {
    tracing::warn!("Rejected JSON body: {}", rejection.body_text());
    BackendError::handler(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Parse a path segment as an entity id.
///
/// # Errors
///
/// * `400 Bad Request` - `raw` is not a UUID; the message names `what`
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        tracing::warn!("Invalid {} id: {:?}", what, raw);
        BackendError::bad_request(format!("Invalid {} id", what))
    })
}
