/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once at startup and never mutated. It holds:
 * - The entity store (`Arc<dyn EntityStore>`)
 * - The media host uploads are relayed to
 * - Token signing keys
 * - The server configuration
 *
 * Every field is an `Arc`, so cloning the state per request is cheap.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the part
 * of the state they need:
 *
 * ```rust,ignore
 * async fn handler(State(store): State<Arc<dyn EntityStore>>) { ... }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::media::MediaHost;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::EntityStore;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub media: Arc<dyn MediaHost>,
    pub tokens: Arc<TokenKeys>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, media: Arc<dyn MediaHost>, config: ServerConfig) -> Self {
        Self {
            store,
            media,
            tokens: Arc::new(TokenKeys::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<dyn EntityStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn MediaHost> {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}

impl FromRef<AppState> for Arc<TokenKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
