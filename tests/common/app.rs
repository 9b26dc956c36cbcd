//! In-memory application under test
//!
//! `TestApp` builds the full router over a `MemoryStore` and a
//! `FakeMediaHost`, then drives it request by request with `oneshot`.
//! Bcrypt runs at its minimum cost and cookies are not marked `Secure`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use vidtube::backend::routes::create_router;
use vidtube::backend::server::{AppState, ServerConfig};
use vidtube::backend::store::{EntityStore, MemoryStore};
use vidtube::shared::models::NewVideo;

use super::media::FakeMediaHost;
use super::multipart::MultipartBody;

/// Password every registered test user gets
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

/// A registered and logged in user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: Arc<FakeMediaHost>,
    _uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_media(FakeMediaHost::new())
    }

    pub fn with_media(media: FakeMediaHost) -> Self {
        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let config = ServerConfig {
            bcrypt_cost: 4,
            secure_cookies: false,
            upload_temp_dir: uploads.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let media = Arc::new(media);
        let state = AppState::new(Arc::new(MemoryStore::new()), media.clone(), config);

        Self {
            router: create_router(state.clone()),
            state,
            media,
            _uploads: uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                panic!("Body is not JSON ({}): {}", e, String::from_utf8_lossy(&bytes))
            })
        };

        TestResponse { status, headers, body }
    }

    fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>) -> TestResponse {
        let request = Self::builder(method, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token).await
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        let request = Self::builder(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: MultipartBody,
    ) -> TestResponse {
        let (content_type, bytes) = body.finish();
        let request = Self::builder(method, uri, token)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(bytes))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Registration form for `username` with an avatar attached
    pub fn registration(username: &str) -> MultipartBody {
        MultipartBody::new()
            .text("fullname", &format!("{} Fullname", username))
            .text("email", &format!("{}@example.com", username))
            .text("username", username)
            .text("password", TEST_PASSWORD)
            .file("avatar", "avatar.png", b"png-bytes")
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.multipart(Method::POST, "/api/v1/users/register", None, Self::registration(username))
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.json(
            Method::POST,
            "/api/v1/users/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Register and log in
    pub async fn signup(&self, username: &str) -> TestUser {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let session = self.login(username, TEST_PASSWORD).await;
        assert_eq!(session.status, StatusCode::OK, "{}", session.body);

        let data = session.data();
        TestUser {
            id: data["user"]["id"]
                .as_str()
                .and_then(|id| Uuid::parse_str(id).ok())
                .expect("Missing user id"),
            username: username.to_string(),
            access_token: data["accessToken"].as_str().expect("Missing access token").to_string(),
            refresh_token: data["refreshToken"].as_str().expect("Missing refresh token").to_string(),
        }
    }

    /// Publish a video through the API
    pub async fn publish(&self, user: &TestUser, title: &str) -> Uuid {
        let form = MultipartBody::new()
            .text("title", title)
            .text("description", &format!("About {}", title))
            .file("videoFile", "clip.mp4", b"mp4-bytes")
            .file("thumbnail", "thumb.png", b"png-bytes");
        let response = self
            .multipart(Method::POST, "/api/v1/videos", Some(&user.access_token), form)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.data()["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("Missing video id")
    }

    /// Insert a video straight into the store
    pub async fn seed_video(&self, owner: Uuid, title: &str) -> Uuid {
        let new_video = NewVideo::new(
            title,
            "seeded",
            format!("https://media.test/{}.mp4", title),
            format!("https://media.test/{}.png", title),
            Some(10.0),
            owner,
        )
        .expect("Invalid seed video");
        self.state
            .store
            .create_video(new_video)
            .await
            .expect("Failed to seed video")
            .id
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
