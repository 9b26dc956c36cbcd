/**
 * Response Envelope
 *
 * Every API result, success or failure, is wrapped in one of two shapes:
 *
 * ```json
 * { "statusCode": 200, "data": { ... }, "message": "...", "success": true }
 * { "statusCode": 404, "data": null, "message": "...", "errors": [], "success": false }
 * ```
 *
 * `success` is derived from the status code (`< 400`) and never set by hand.
 */

use serde::{Deserialize, Serialize};

/// Successful result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// 200 OK
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(200, data, message)
    }

    /// 201 Created
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(201, data, message)
    }
}

/// `data` for responses that carry no payload; serializes as `{}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Failure envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub status_code: u16,
    /// Always `null`
    pub data: Option<()>,
    pub message: String,
    pub errors: Vec<String>,
    pub success: bool,
}

impl ApiErrorBody {
    pub fn new(status_code: u16, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status_code,
            data: None,
            message: message.into(),
            errors,
            success: status_code < 400,
        }
    }
}
