/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (after `dotenv`), and opening the entity store it describes.
 *
 * # Configuration Sources
 *
 * Every setting has a development default, so the server starts with zero
 * configuration: no `DATABASE_URL` means an in-process store, no Cloudinary
 * credentials means uploads are rejected, and missing token secrets fall
 * back to fixed development values with a warning.
 *
 * # Construction in tests
 *
 * Fields are public and `Default` is implemented, so tests build a config
 * with struct-update syntax instead of touching the environment.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::backend::store::{EntityStore, MemoryStore, PgStore, StoreResult};

const DEV_ACCESS_SECRET: &str = "dev-access-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-change-in-production";

/// Cloudinary account credentials
#[derive(Debug, Clone, PartialEq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Env: `SERVER_PORT`. Default: `3000`
    pub port: u16,

    /// Env: `DATABASE_URL`. Default: none (in-process store)
    pub database_url: Option<String>,

    /// Env: `DATABASE_MAX_CONNECTIONS`. Default: `10`
    pub database_max_connections: u32,

    /// Env: `ACCESS_TOKEN_SECRET`
    pub access_token_secret: String,

    /// Env: `ACCESS_TOKEN_EXPIRY_SECS`. Default: one day
    pub access_token_ttl_secs: u64,

    /// Env: `REFRESH_TOKEN_SECRET`
    pub refresh_token_secret: String,

    /// Env: `REFRESH_TOKEN_EXPIRY_SECS`. Default: ten days
    pub refresh_token_ttl_secs: u64,

    /// Env: `CORS_ORIGIN`. Default: any origin
    pub cors_origin: Option<String>,

    /// Env: `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`
    pub cloudinary: Option<CloudinaryConfig>,

    /// Where multipart uploads are spooled. Env: `UPLOAD_TEMP_DIR`.
    /// Default: `./public/temp`
    pub upload_temp_dir: PathBuf,

    /// Request body cap for upload routes. Env: `MAX_UPLOAD_BYTES`.
    /// Default: 100 MiB
    pub max_upload_bytes: usize,

    /// Env: `BCRYPT_COST`. Default: `bcrypt::DEFAULT_COST`
    pub bcrypt_cost: u32,

    /// Mark auth cookies `Secure`. Env: `COOKIE_SECURE`. Default: `true`
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_max_connections: 10,
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            access_token_ttl_secs: 24 * 60 * 60,
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            refresh_token_ttl_secs: 10 * 24 * 60 * 60,
            cors_origin: None,
            cloudinary: None,
            upload_temp_dir: PathBuf::from("./public/temp"),
            max_upload_bytes: 100 * 1024 * 1024,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            secure_cookies: true,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse `key` if set; keep `default` and warn when the value is malformed
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match env_string(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(value = %raw, "Invalid {}, using default", key);
                default
            }
        },
        None => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_token_secret = env_string("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set. Using development secret.");
            defaults.access_token_secret.clone()
        });
        let refresh_token_secret = env_string("REFRESH_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set. Using development secret.");
            defaults.refresh_token_secret.clone()
        });

        let cloudinary = match (
            env_string("CLOUDINARY_CLOUD_NAME"),
            env_string("CLOUDINARY_API_KEY"),
            env_string("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => {
                tracing::warn!("Cloudinary credentials not set. Media uploads will be rejected.");
                None
            }
        };

        Self {
            port: env_parse("SERVER_PORT", defaults.port),
            database_url: env_string("DATABASE_URL"),
            database_max_connections: env_parse(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            access_token_secret,
            access_token_ttl_secs: env_parse("ACCESS_TOKEN_EXPIRY_SECS", defaults.access_token_ttl_secs),
            refresh_token_secret,
            refresh_token_ttl_secs: env_parse(
                "REFRESH_TOKEN_EXPIRY_SECS",
                defaults.refresh_token_ttl_secs,
            ),
            cors_origin: env_string("CORS_ORIGIN"),
            cloudinary,
            upload_temp_dir: env_string("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_temp_dir),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            bcrypt_cost: env_parse("BCRYPT_COST", defaults.bcrypt_cost),
            secure_cookies: env_parse("COOKIE_SECURE", defaults.secure_cookies),
        }
    }
}

/// Open the entity store described by `config`
///
/// - `DATABASE_URL` set: connect, run migrations, return a `PgStore`
/// - otherwise: an empty `MemoryStore`
///
/// # Errors
///
/// A configured database that cannot be reached or migrated is an error;
/// the server does not silently fall back to memory.
pub async fn load_store(config: &ServerConfig) -> StoreResult<Arc<dyn EntityStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-process store; data will not persist.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
