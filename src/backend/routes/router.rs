/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * Applied to every route, outermost first:
 * 1. `TraceLayer` - one tracing span per request
 * 2. `CorsLayer` - `CORS_ORIGIN` with credentials, or any origin without
 * 3. `DefaultBodyLimit` - raised to `max_upload_bytes` for multipart uploads
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Allowed origins for browser clients
///
/// A configured origin gets credentialed CORS so the session cookies are
/// sent; without one any origin is allowed, cookies excluded.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match config.cors_origin.as_deref().map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Some(Err(e)) => {
            tracing::warn!("Invalid CORS_ORIGIN ({}), allowing any origin", e);
            CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any)
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any),
    }
}

async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

/// Create the Axum router with all routes configured
///
/// Everything lives under `/api/v1`; unknown paths answer with a 404
/// envelope.
pub fn create_router(app_state: AppState) -> Router<()> {
    let api = configure_api_routes(&app_state);

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
