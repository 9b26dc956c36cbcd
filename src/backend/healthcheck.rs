//! Healthcheck
//!
//! `GET /api/v1/healthcheck` answers as long as the process is serving
//! requests; it does not touch the store.

use serde::Serialize;

use crate::backend::error::ApiResult;
use crate::shared::ApiResponse;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Health {
    pub status: &'static str,
}

pub async fn healthcheck() -> ApiResult<Health> {
    Ok(ApiResponse::ok(Health { status: "OK" }, "Healthcheck passed"))
}
