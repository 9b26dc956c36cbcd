/**
 * Error Conversion
 *
 * `IntoResponse` for the backend error and the success envelope. Both write
 * the envelope's `statusCode` as the HTTP status.
 *
 * # Response Format
 *
 * ```json
 * { "statusCode": 404, "data": null, "message": "Video not found", "errors": [], "success": false }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;
use crate::shared::{ApiErrorBody, ApiResponse};

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::warn!("Request rejected with {}: {}", status, self.message());
        }

        let body = ApiErrorBody::new(status.as_u16(), self.message(), self.errors());
        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
