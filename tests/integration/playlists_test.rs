//! Playlists

use axum::http::Method;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;
use crate::{assert_envelope, assert_status};

async fn create(app: &TestApp, user: &TestUser, name: &str) -> Uuid {
    let response = app
        .json(
            Method::POST,
            "/api/v1/playlists",
            Some(&user.access_token),
            json!({ "name": name, "description": "mix" }),
        )
        .await;
    assert_envelope!(response, 201, "Playlist created successfully");
    Uuid::parse_str(response.data()["id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_requires_name() {
    let app = TestApp::new();
    let user = app.signup("user").await;
    let response = app
        .json(
            Method::POST,
            "/api/v1/playlists",
            Some(&user.access_token),
            json!({ "description": "no name" }),
        )
        .await;
    assert_status!(response, 400);
}

#[tokio::test]
async fn test_add_and_remove_videos_track_duration() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let playlist_id = create(&app, &owner, "favourites").await;
    let first = app.seed_video(owner.id, "first").await;
    let second = app.seed_video(owner.id, "second").await;

    for video_id in [first, second, first] {
        let added = app
            .request(
                Method::PATCH,
                &format!("/api/v1/playlists/add/{}/{}", video_id, playlist_id),
                Some(&owner.access_token),
            )
            .await;
        assert_envelope!(added, 200, "Video added to playlist");
    }

    let playlist = app
        .get(&format!("/api/v1/playlists/{}", playlist_id), None)
        .await;
    assert_status!(playlist, 200);
    assert_eq!(playlist.data()["duration"], 20.0);
    let videos = playlist.data()["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "first");
    assert_eq!(playlist.data()["owner"]["username"], "owner");

    let removed = app
        .request(
            Method::PATCH,
            &format!("/api/v1/playlists/remove/{}/{}", first, playlist_id),
            Some(&owner.access_token),
        )
        .await;
    assert_envelope!(removed, 200, "Video removed from playlist");
    assert_eq!(removed.data()["duration"], 10.0);
    assert_eq!(removed.data()["videos"], json!([second.to_string()]));
}

#[tokio::test]
async fn test_only_owner_modifies_playlist() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let other = app.signup("other").await;
    let playlist_id = create(&app, &owner, "mine").await;
    let video_id = app.seed_video(other.id, "theirs").await;
    let uri = format!("/api/v1/playlists/{}", playlist_id);

    let rename = app
        .json(Method::PATCH, &uri, Some(&other.access_token), json!({ "name": "stolen" }))
        .await;
    assert_envelope!(rename, 403, "This playlist is not owned by you");

    let add = app
        .request(
            Method::PATCH,
            &format!("/api/v1/playlists/add/{}/{}", video_id, playlist_id),
            Some(&other.access_token),
        )
        .await;
    assert_status!(add, 403);

    let delete = app.request(Method::DELETE, &uri, Some(&other.access_token)).await;
    assert_status!(delete, 403);

    let renamed = app
        .json(
            Method::PATCH,
            &uri,
            Some(&owner.access_token),
            json!({ "name": "renamed", "description": "new" }),
        )
        .await;
    assert_status!(renamed, 200);
    assert_eq!(renamed.data()["name"], "renamed");

    let deleted = app.request(Method::DELETE, &uri, Some(&owner.access_token)).await;
    assert_envelope!(deleted, 200, "Playlist deleted successfully");
    let gone = app.get(&uri, None).await;
    assert_envelope!(gone, 404, "Playlist not found");
}

#[tokio::test]
async fn test_user_playlists() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    create(&app, &owner, "one").await;
    create(&app, &owner, "two").await;

    let response = app
        .get(&format!("/api/v1/playlists/user/{}", owner.id), None)
        .await;
    assert_status!(response, 200);
    assert_eq!(response.data().as_array().unwrap().len(), 2);

    let bad = app.get("/api/v1/playlists/user/nope", None).await;
    assert_envelope!(bad, 400, "Invalid user id");
}
