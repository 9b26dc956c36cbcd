//! Video listing, publishing and watching

use axum::http::Method;
use serde_json::json;

use vidtube::backend::store::EntityStore;

use crate::common::*;
use crate::{assert_envelope, assert_status};

#[tokio::test]
async fn test_listing_second_page() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    for n in 0..15 {
        app.seed_video(owner.id, &format!("video-{:02}", n)).await;
    }

    let response = app.get("/api/v1/videos?page=2&limit=12", None).await;
    assert_envelope!(response, 200, "Videos fetched successfully");

    let page = response.data();
    assert_eq!(page["videos"].as_array().unwrap().len(), 3);
    assert_eq!(page["totalVideos"], 15);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["page"], 2);
    assert_eq!(page["hasPrevPage"], true);
    assert_eq!(page["hasNextPage"], false);
    assert_eq!(page["prevPage"], 1);
    assert_eq!(page["nextPage"], serde_json::Value::Null);
    assert_eq!(page["videos"][0]["owner"]["username"], "owner");
}

#[tokio::test]
async fn test_listing_defaults_and_empty_result() {
    let app = TestApp::new();
    let empty = app.get("/api/v1/videos", None).await;
    assert_envelope!(empty, 200, "No videos found");
    assert_eq!(empty.data()["totalVideos"], 0);
    assert_eq!(empty.data()["limit"], 12);

    let owner = app.signup("owner").await;
    app.seed_video(owner.id, "only").await;
    let garbage = app.get("/api/v1/videos?page=abc&limit=-4", None).await;
    assert_eq!(garbage.data()["page"], 1);
    assert_eq!(garbage.data()["limit"], 12);
    assert_eq!(garbage.data()["videos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_listing_search_and_sort() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    app.seed_video(owner.id, "rust-basics").await;
    app.seed_video(owner.id, "cooking").await;
    app.seed_video(owner.id, "advanced-rust").await;

    let response = app
        .get("/api/v1/videos?query=RUST&sortBy=title&sortType=1", None)
        .await;
    let videos = response.data()["videos"].as_array().unwrap().clone();
    let titles: Vec<&str> = videos.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["advanced-rust", "rust-basics"]);
}

#[tokio::test]
async fn test_listing_huge_page_number_is_empty() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    app.seed_video(owner.id, "only").await;

    let response = app
        .get("/api/v1/videos?page=18446744073709551615&limit=2", None)
        .await;
    assert_status!(response, 200);
    let page = response.data();
    assert!(page["videos"].as_array().unwrap().is_empty());
    assert_eq!(page["totalVideos"], 1);
    assert_eq!(page["hasPrevPage"], true);
    assert_eq!(page["hasNextPage"], false);
}

#[tokio::test]
async fn test_sorted_listing_pages_through_every_video() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    for title in ["delta", "alpha", "charlie", "bravo", "echo"] {
        app.seed_video(owner.id, title).await;
    }

    let mut titles = Vec::new();
    for page in 1..=3 {
        let response = app
            .get(&format!("/api/v1/videos?sortBy=title&sortType=-1&limit=2&page={}", page), None)
            .await;
        assert_eq!(response.data()["totalVideos"], 5);
        for video in response.data()["videos"].as_array().unwrap() {
            titles.push(video["title"].as_str().unwrap().to_string());
        }
    }
    assert_eq!(titles, vec!["echo", "delta", "charlie", "bravo", "alpha"]);
}

#[tokio::test]
async fn test_publish_video() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let video_id = app.publish(&owner, "First upload").await;

    let video = app
        .state
        .store
        .find_video_by_id(video_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(video.owner_id, owner.id);
    assert_eq!(video.duration, FAKE_DURATION);
    assert!(video.is_published);
    assert_eq!(video.views, 0);
}

#[tokio::test]
async fn test_publish_requires_files() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;

    let no_video = MultipartBody::new()
        .text("title", "t")
        .text("description", "d")
        .file("thumbnail", "thumb.png", b"png");
    let response = app
        .multipart(Method::POST, "/api/v1/videos", Some(&owner.access_token), no_video)
        .await;
    assert_envelope!(response, 400, "Video file is required");

    let no_thumbnail = MultipartBody::new()
        .text("title", "t")
        .text("description", "d")
        .file("videoFile", "clip.mp4", b"mp4");
    let response = app
        .multipart(Method::POST, "/api/v1/videos", Some(&owner.access_token), no_thumbnail)
        .await;
    assert_envelope!(response, 400, "Thumbnail is required");

    let no_title = MultipartBody::new()
        .text("description", "d")
        .file("videoFile", "clip.mp4", b"mp4")
        .file("thumbnail", "thumb.png", b"png");
    let response = app
        .multipart(Method::POST, "/api/v1/videos", Some(&owner.access_token), no_title)
        .await;
    assert_status!(response, 400);
}

#[tokio::test]
async fn test_publish_requires_login() {
    let app = TestApp::new();
    let form = MultipartBody::new().text("title", "t");
    let response = app.multipart(Method::POST, "/api/v1/videos", None, form).await;
    assert_envelope!(response, 401, "Unauthorized request");
}

#[tokio::test]
async fn test_watching_records_history_once() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let viewer = app.signup("viewer").await;
    let first = app.seed_video(owner.id, "first").await;
    let second = app.seed_video(owner.id, "second").await;

    let uri = format!("/api/v1/videos/{}", first);
    let watched = app.get(&uri, Some(&viewer.access_token)).await;
    assert_envelope!(watched, 200, "Video fetched successfully");
    assert_eq!(watched.data()["views"], 1);
    assert_eq!(watched.data()["owner"]["username"], "owner");

    let again = app.get(&uri, Some(&viewer.access_token)).await;
    assert_eq!(again.data()["views"], 1);

    app.get(&format!("/api/v1/videos/{}", second), Some(&viewer.access_token))
        .await;

    let history = app.get("/api/v1/users/history", Some(&viewer.access_token)).await;
    assert_status!(history, 200);
    let ids: Vec<String> = history
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![first.to_string(), second.to_string()]);
}

#[tokio::test]
async fn test_get_video_errors() {
    let app = TestApp::new();
    let viewer = app.signup("viewer").await;

    let bad_id = app.get("/api/v1/videos/not-a-uuid", Some(&viewer.access_token)).await;
    assert_envelope!(bad_id, 400, "Invalid video id");

    let missing = app
        .get(&format!("/api/v1/videos/{}", uuid::Uuid::new_v4()), Some(&viewer.access_token))
        .await;
    assert_envelope!(missing, 404, "Video not found");
}

#[tokio::test]
async fn test_only_owner_updates_video() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let other = app.signup("other").await;
    let video_id = app.seed_video(owner.id, "mine").await;
    let uri = format!("/api/v1/videos/{}", video_id);

    let denied = app
        .json(Method::PATCH, &uri, Some(&other.access_token), json!({ "title": "stolen" }))
        .await;
    assert_envelope!(denied, 403, "This video is not published by you");

    let updated = app
        .json(Method::PATCH, &uri, Some(&owner.access_token), json!({ "title": "renamed" }))
        .await;
    assert_status!(updated, 200);
    assert_eq!(updated.data()["title"], "renamed");
    assert_eq!(updated.data()["description"], "seeded");
}

#[tokio::test]
async fn test_toggle_publish_and_delete() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let other = app.signup("other").await;
    let video_id = app.seed_video(owner.id, "draft").await;

    let toggled = app
        .request(
            Method::PATCH,
            &format!("/api/v1/videos/toggle/publish/{}", video_id),
            Some(&owner.access_token),
        )
        .await;
    assert_status!(toggled, 200);
    assert_eq!(toggled.data()["isPublished"], false);

    let uri = format!("/api/v1/videos/{}", video_id);
    let denied = app.request(Method::DELETE, &uri, Some(&other.access_token)).await;
    assert_status!(denied, 403);

    let deleted = app.request(Method::DELETE, &uri, Some(&owner.access_token)).await;
    assert_status!(deleted, 200);

    let gone = app.get(&uri, Some(&owner.access_token)).await;
    assert_status!(gone, 404);
}

#[tokio::test]
async fn test_user_videos_is_public() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    app.seed_video(owner.id, "one").await;
    app.seed_video(owner.id, "two").await;

    let response = app.get(&format!("/api/v1/videos/user/{}", owner.id), None).await;
    assert_status!(response, 200);
    assert_eq!(response.data().as_array().unwrap().len(), 2);
}
