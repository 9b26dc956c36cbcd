//! Registration, sessions and account maintenance

use axum::http::{header, Method, Request};
use axum::body::Body;
use serde_json::json;

use crate::common::*;
use crate::{assert_envelope, assert_no_key, assert_status};

#[tokio::test]
async fn test_register_hides_secrets() {
    let app = TestApp::new();
    let response = app.register("alice").await;

    assert_envelope!(response, 201, "User registered successfully");
    let user = response.data();
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user["avatar"].as_str().unwrap().starts_with("https://media.test/"));
    assert!(user["avatar"].as_str().unwrap().ends_with("/avatar.png"));
    assert_eq!(user["coverImage"], "");
    assert_no_key!(user, "password");
    assert_no_key!(user, "passwordHash");
    assert_no_key!(user, "refreshToken");
}

#[tokio::test]
async fn test_register_lowercases_username() {
    let app = TestApp::new();
    let form = TestApp::registration("Bob").text("coverImage", "ignored");
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;

    assert_status!(response, 201);
    assert_eq!(response.data()["username"], "bob");
}

#[tokio::test]
async fn test_register_with_cover_image() {
    let app = TestApp::new();
    let form = TestApp::registration("carol").file("coverImage", "cover.png", b"cover");
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;

    assert_status!(response, 201);
    assert!(response.data()["coverImage"]
        .as_str()
        .unwrap()
        .starts_with("https://media.test/"));
    assert!(response.data()["coverImage"].as_str().unwrap().ends_with("/cover.png"));
    assert_eq!(app.media.upload_count(), 2);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    assert_status!(app.register("alice").await, 201);

    let response = app.register("alice").await;
    assert_envelope!(response, 409, "Someone with this username/email already exists");
    assert_eq!(response.body["data"], serde_json::Value::Null);
}

fn registration_as(username: &str, email: &str, password: &str) -> MultipartBody {
    MultipartBody::new()
        .text("fullname", "Someone Else")
        .text("email", email)
        .text("username", username)
        .text("password", password)
        .file("avatar", "avatar.png", b"png-bytes")
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    assert_status!(app.register("alice").await, 201);

    let form = registration_as("alice2", "alice@example.com", TEST_PASSWORD);
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;
    assert_envelope!(response, 409, "Someone with this username/email already exists");
    assert_eq!(app.media.upload_count(), 1);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new();
    assert_status!(app.register("alice").await, 201);

    let form = registration_as("ALICE", "other@example.com", TEST_PASSWORD);
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;
    assert_envelope!(response, 409, "Someone with this username/email already exists");
}

#[tokio::test]
async fn test_password_whitespace_is_significant() {
    let app = TestApp::new();
    let form = registration_as("padded", "padded@example.com", "  spaced out  ");
    let registered = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;
    assert_status!(registered, 201);

    let trimmed = app.login("padded", "spaced out").await;
    assert_envelope!(trimmed, 401, "Invalid user credentials");

    let exact = app.login("padded", "  spaced out  ").await;
    assert_status!(exact, 200);
}

#[tokio::test]
async fn test_register_requires_avatar() {
    let app = TestApp::new();
    let form = MultipartBody::new()
        .text("fullname", "Dan")
        .text("email", "dan@example.com")
        .text("username", "dan")
        .text("password", TEST_PASSWORD);
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;

    assert_envelope!(response, 400, "Avatar file is required");
}

#[tokio::test]
async fn test_register_rejected_upload() {
    let app = TestApp::with_media(FakeMediaHost::failing());
    let response = app.register("erin").await;

    assert_envelope!(response, 400, "Avatar file is required");
    let login = app.login("erin", TEST_PASSWORD).await;
    assert_status!(login, 404);
}

#[tokio::test]
async fn test_register_requires_every_text_field() {
    let app = TestApp::new();
    let form = MultipartBody::new()
        .text("fullname", "  ")
        .text("email", "frank@example.com")
        .text("username", "frank")
        .text("password", TEST_PASSWORD)
        .file("avatar", "a.png", b"png");
    let response = app
        .multipart(Method::POST, "/api/v1/users/register", None, form)
        .await;

    assert_status!(response, 400);
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.signup("alice").await;

    let missing = app
        .json(Method::POST, "/api/v1/users/login", None, json!({ "password": "x" }))
        .await;
    assert_envelope!(missing, 400, "username or email is required");

    let unknown = app.login("nobody", TEST_PASSWORD).await;
    assert_envelope!(unknown, 404, "User does not exist");

    let wrong = app.login("alice", "wrong password").await;
    assert_envelope!(wrong, 401, "Invalid user credentials");
}

#[tokio::test]
async fn test_login_by_email_sets_cookies() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app
        .json(
            Method::POST,
            "/api/v1/users/login",
            None,
            json!({ "email": "Alice@Example.com", "password": TEST_PASSWORD }),
        )
        .await;

    assert_envelope!(response, 200, "User logged in successfully");
    assert_no_key!(response.data()["user"], "refreshToken");
    let cookies = response.set_cookies();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=") && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=") && c.contains("HttpOnly")));
}

#[tokio::test]
async fn test_current_user_by_cookie_and_bearer() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let bearer = app
        .get("/api/v1/users/current-user", Some(&alice.access_token))
        .await;
    assert_status!(bearer, 200);
    assert_eq!(bearer.data()["username"], "alice");

    let request = Request::get("/api/v1/users/current-user")
        .header(header::COOKIE, format!("accessToken={}", alice.access_token))
        .body(Body::empty())
        .unwrap();
    let cookie = app.send(request).await;
    assert_status!(cookie, 200);
    assert_eq!(cookie.data()["id"], alice.id.to_string());
}

#[tokio::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let app = TestApp::new();

    let missing = app.get("/api/v1/users/current-user", None).await;
    assert_envelope!(missing, 401, "Unauthorized request");

    let bad = app
        .get("/api/v1/users/current-user", Some("not-a-token"))
        .await;
    assert_envelope!(bad, 401, "Invalid access token");
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let refreshed = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            json!({ "refreshToken": alice.refresh_token }),
        )
        .await;
    assert_envelope!(refreshed, 200, "Access token refreshed");
    let new_refresh = refreshed.data()["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, alice.refresh_token);

    let replay = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            json!({ "refreshToken": alice.refresh_token }),
        )
        .await;
    assert_envelope!(replay, 401, "Refresh token is expired or used");

    let request = Request::post("/api/v1/users/refresh-token")
        .header(header::COOKIE, format!("refreshToken={}", new_refresh))
        .body(Body::empty())
        .unwrap();
    assert_status!(app.send(request).await, 200);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();
    let response = app
        .request(Method::POST, "/api/v1/users/refresh-token", None)
        .await;
    assert_envelope!(response, 401, "Unauthorized request");

    let garbage = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            json!({ "refreshToken": "garbage" }),
        )
        .await;
    assert_envelope!(garbage, 401, "Invalid refresh token");
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let logout = app
        .request(Method::POST, "/api/v1/users/logout", Some(&alice.access_token))
        .await;
    assert_envelope!(logout, 200, "User logged out");
    assert_eq!(logout.data(), &json!({}));

    let refresh = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            json!({ "refreshToken": alice.refresh_token }),
        )
        .await;
    assert_envelope!(refresh, 401, "Refresh token is expired or used");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let wrong = app
        .json(
            Method::POST,
            "/api/v1/users/change-password",
            Some(&alice.access_token),
            json!({ "oldPassword": "nope", "newPassword": "new secret" }),
        )
        .await;
    assert_envelope!(wrong, 400, "Invalid old password");

    let changed = app
        .json(
            Method::POST,
            "/api/v1/users/change-password",
            Some(&alice.access_token),
            json!({ "oldPassword": TEST_PASSWORD, "newPassword": "new secret" }),
        )
        .await;
    assert_envelope!(changed, 200, "Password changed successfully");

    assert_status!(app.login("alice", TEST_PASSWORD).await, 401);
    assert_status!(app.login("alice", "new secret").await, 200);
}

#[tokio::test]
async fn test_update_account_details() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let response = app
        .json(
            Method::PATCH,
            "/api/v1/users/update-account",
            Some(&alice.access_token),
            json!({ "fullname": "Alice Liddell", "email": "ALICE@wonder.land" }),
        )
        .await;

    assert_status!(response, 200);
    assert_eq!(response.data()["fullname"], "Alice Liddell");
    assert_eq!(response.data()["email"], "alice@wonder.land");

    let incomplete = app
        .json(
            Method::PATCH,
            "/api/v1/users/update-account",
            Some(&alice.access_token),
            json!({ "fullname": "Only Name" }),
        )
        .await;
    assert_status!(incomplete, 400);
}

#[tokio::test]
async fn test_update_avatar() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let missing = app
        .multipart(
            Method::PATCH,
            "/api/v1/users/avatar",
            Some(&alice.access_token),
            MultipartBody::new().text("note", "no file"),
        )
        .await;
    assert_envelope!(missing, 400, "Avatar file is missing");

    let before = app.get("/api/v1/users/current-user", Some(&alice.access_token)).await;
    let updated = app
        .multipart(
            Method::PATCH,
            "/api/v1/users/avatar",
            Some(&alice.access_token),
            MultipartBody::new().file("avatar", "new.png", b"new"),
        )
        .await;
    assert_status!(updated, 200);
    assert_ne!(updated.data()["avatar"], before.data()["avatar"]);
}

#[tokio::test]
async fn test_channel_profile_counts_subscribers() {
    let app = TestApp::new();
    let channel = app.signup("channel").await;
    let mut fans = Vec::new();
    for name in ["fan1", "fan2", "fan3"] {
        let fan = app.signup(name).await;
        let toggled = app
            .request(
                Method::POST,
                &format!("/api/v1/subscriptions/c/{}", channel.id),
                Some(&fan.access_token),
            )
            .await;
        assert_envelope!(toggled, 200, "Subscribed");
        fans.push(fan);
    }

    let profile = app
        .get("/api/v1/users/c/channel", Some(&fans[0].access_token))
        .await;
    assert_status!(profile, 200);
    assert_eq!(profile.data()["subscribersCount"], 3);
    assert_eq!(profile.data()["channelsSubscribedToCount"], 0);
    assert_eq!(profile.data()["isSubscribed"], true);

    let own = app
        .get("/api/v1/users/c/channel", Some(&channel.access_token))
        .await;
    assert_eq!(own.data()["isSubscribed"], false);

    let fan_profile = app
        .get("/api/v1/users/c/fan2", Some(&channel.access_token))
        .await;
    assert_eq!(fan_profile.data()["channelsSubscribedToCount"], 1);

    let missing = app
        .get("/api/v1/users/c/ghost", Some(&channel.access_token))
        .await;
    assert_envelope!(missing, 404, "Channel does not exist");
}
