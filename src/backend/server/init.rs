/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, media host selection and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the entity store (PostgreSQL when `DATABASE_URL` is set, otherwise
 *    the in-process store)
 * 2. Pick the media host (Cloudinary when credentials are set, otherwise a
 *    host that rejects every upload)
 * 3. Build `AppState` and the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::media::{CloudinaryHost, DisabledMediaHost, MediaHost};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::StoreResult;

/// Media host for `config`
pub fn load_media_host(config: &ServerConfig) -> Arc<dyn MediaHost> {
    match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!("Uploading media to Cloudinary cloud {}", cloudinary.cloud_name);
            Arc::new(CloudinaryHost::new(cloudinary.clone()))
        }
        None => {
            tracing::warn!("Cloudinary credentials not set. File uploads will be rejected.");
            Arc::new(DisabledMediaHost)
        }
    }
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when a configured database cannot be reached or migrated.
pub async fn create_app(config: ServerConfig) -> StoreResult<Router<()>> {
    tracing::info!("Initializing vidtube backend server");

    let store = load_store(&config).await?;
    let media = load_media_host(&config);
    let app_state = AppState::new(store, media, config);

    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
