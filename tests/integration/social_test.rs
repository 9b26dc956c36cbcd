//! Comments, likes and subscriptions

use axum::http::Method;
use serde_json::json;
use uuid::Uuid;

use vidtube::backend::store::EntityStore;

use crate::common::*;
use crate::{assert_envelope, assert_status};

async fn comment(app: &TestApp, user: &TestUser, video_id: Uuid, content: &str) -> Uuid {
    let response = app
        .json(
            Method::POST,
            &format!("/api/v1/comments/{}", video_id),
            Some(&user.access_token),
            json!({ "content": content }),
        )
        .await;
    assert_status!(response, 201);
    Uuid::parse_str(response.data()["id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_add_comment() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let video_id = app.seed_video(owner.id, "clip").await;
    let uri = format!("/api/v1/comments/{}", video_id);

    let missing = app
        .json(Method::POST, &uri, Some(&owner.access_token), json!({}))
        .await;
    assert_envelope!(missing, 400, "Error while getting the content from body");

    let blank = app
        .json(Method::POST, &uri, Some(&owner.access_token), json!({ "content": "   " }))
        .await;
    assert_envelope!(blank, 400, "Cannot post an empty comment");

    let added = app
        .json(Method::POST, &uri, Some(&owner.access_token), json!({ "content": "nice!" }))
        .await;
    assert_envelope!(added, 201, "Comment added successfully");
    assert_eq!(added.data()["content"], "nice!");
    assert_eq!(added.data()["video"], video_id.to_string());
    assert_eq!(added.data()["owner"], owner.id.to_string());
}

#[tokio::test]
async fn test_comment_without_body_reports_missing_content() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let video_id = app.seed_video(owner.id, "clip").await;

    let added = app
        .request(Method::POST, &format!("/api/v1/comments/{}", video_id), Some(&owner.access_token))
        .await;
    assert_envelope!(added, 400, "Error while getting the content from body");

    let comment_id = comment(&app, &owner, video_id, "first take").await;
    let edited = app
        .request(
            Method::PATCH,
            &format!("/api/v1/comments/c/{}", comment_id),
            Some(&owner.access_token),
        )
        .await;
    assert_envelope!(edited, 400, "Content field is mandatory");
}

#[tokio::test]
async fn test_comment_on_missing_video() {
    let app = TestApp::new();
    let user = app.signup("user").await;
    let response = app
        .json(
            Method::POST,
            &format!("/api/v1/comments/{}", Uuid::new_v4()),
            Some(&user.access_token),
            json!({ "content": "hello" }),
        )
        .await;
    assert_envelope!(response, 404, "Video not found");
}

#[tokio::test]
async fn test_comment_listing_is_paginated_with_owners() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let video_id = app.seed_video(owner.id, "clip").await;
    for n in 0..12 {
        comment(&app, &owner, video_id, &format!("comment {}", n)).await;
    }

    let first = app.get(&format!("/api/v1/comments/{}", video_id), None).await;
    assert_envelope!(first, 200, "Comments fetched successfully");
    assert_eq!(first.data()["comments"].as_array().unwrap().len(), 10);
    assert_eq!(first.data()["totalComments"], 12);
    assert_eq!(first.data()["hasNextPage"], true);
    assert_eq!(first.data()["comments"][0]["owner"]["username"], "owner");

    let second = app
        .get(&format!("/api/v1/comments/{}?page=2", video_id), None)
        .await;
    assert_eq!(second.data()["comments"].as_array().unwrap().len(), 2);

    let unknown = app
        .get(&format!("/api/v1/comments/{}", Uuid::new_v4()), None)
        .await;
    assert_status!(unknown, 200);
    assert_eq!(unknown.data()["totalComments"], 0);
}

#[tokio::test]
async fn test_only_author_edits_or_deletes_comment() {
    let app = TestApp::new();
    let author = app.signup("author").await;
    let other = app.signup("other").await;
    let video_id = app.seed_video(author.id, "clip").await;
    let comment_id = comment(&app, &author, video_id, "first take").await;
    let uri = format!("/api/v1/comments/c/{}", comment_id);

    let denied = app.request(Method::DELETE, &uri, Some(&other.access_token)).await;
    assert_envelope!(denied, 403, "This is not your comment");
    let still_there = app.state.store.find_comment_by_id(comment_id).await.unwrap();
    assert!(still_there.is_some());

    let no_content = app
        .json(Method::PATCH, &uri, Some(&author.access_token), json!({}))
        .await;
    assert_envelope!(no_content, 400, "Content field is mandatory");

    let edited = app
        .json(
            Method::PATCH,
            &uri,
            Some(&author.access_token),
            json!({ "newcontent": "second take" }),
        )
        .await;
    assert_status!(edited, 200);
    assert_eq!(edited.data()["content"], "second take");

    let deleted = app.request(Method::DELETE, &uri, Some(&author.access_token)).await;
    assert_envelope!(deleted, 200, "Comment deleted successfully");
    let gone = app.state.store.find_comment_by_id(comment_id).await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn test_video_like_toggles() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let fan = app.signup("fan").await;
    let video_id = app.seed_video(owner.id, "clip").await;
    let uri = format!("/api/v1/likes/toggle/v/{}", video_id);

    let liked = app.request(Method::POST, &uri, Some(&fan.access_token)).await;
    assert_envelope!(liked, 200, "Liked");
    assert_eq!(liked.data()["isLiked"], true);
    assert_eq!(liked.data()["like"]["video"], video_id.to_string());

    let listing = app.get("/api/v1/likes/videos", Some(&fan.access_token)).await;
    assert_eq!(listing.data().as_array().unwrap().len(), 1);
    assert_eq!(listing.data()[0]["video"]["title"], "clip");

    let unliked = app.request(Method::POST, &uri, Some(&fan.access_token)).await;
    assert_envelope!(unliked, 200, "Like removed");
    assert_eq!(unliked.data()["isLiked"], false);

    let listing = app.get("/api/v1/likes/videos", Some(&fan.access_token)).await;
    assert!(listing.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_like_and_missing_targets() {
    let app = TestApp::new();
    let owner = app.signup("owner").await;
    let video_id = app.seed_video(owner.id, "clip").await;
    let comment_id = comment(&app, &owner, video_id, "first").await;

    let liked = app
        .request(
            Method::POST,
            &format!("/api/v1/likes/toggle/c/{}", comment_id),
            Some(&owner.access_token),
        )
        .await;
    assert_envelope!(liked, 200, "Liked");
    assert_eq!(liked.data()["like"]["comment"], comment_id.to_string());

    let missing = app
        .request(
            Method::POST,
            &format!("/api/v1/likes/toggle/v/{}", Uuid::new_v4()),
            Some(&owner.access_token),
        )
        .await;
    assert_envelope!(missing, 404, "Video not found");

    let tweet = app
        .request(
            Method::POST,
            &format!("/api/v1/likes/toggle/t/{}", Uuid::new_v4()),
            Some(&owner.access_token),
        )
        .await;
    assert_status!(tweet, 501);
}

#[tokio::test]
async fn test_subscription_toggle_and_listings() {
    let app = TestApp::new();
    let channel = app.signup("channel").await;
    let fan = app.signup("fan").await;
    let uri = format!("/api/v1/subscriptions/c/{}", channel.id);

    let own = app
        .request(
            Method::POST,
            &format!("/api/v1/subscriptions/c/{}", fan.id),
            Some(&fan.access_token),
        )
        .await;
    assert_status!(own, 400);

    let subscribed = app.request(Method::POST, &uri, Some(&fan.access_token)).await;
    assert_envelope!(subscribed, 200, "Subscribed");
    assert_eq!(subscribed.data()["isSubscribed"], true);

    let subscribers = app.get(&uri, Some(&channel.access_token)).await;
    assert_status!(subscribers, 200);
    assert_eq!(subscribers.data()[0]["subscriber"]["username"], "fan");

    let not_owner = app.get(&uri, Some(&fan.access_token)).await;
    assert_envelope!(not_owner, 403, "This channel is not owned by you");

    let channels = app
        .get(&format!("/api/v1/subscriptions/u/{}", fan.id), Some(&fan.access_token))
        .await;
    assert_eq!(channels.data()[0]["channel"]["username"], "channel");

    let unsubscribed = app.request(Method::POST, &uri, Some(&fan.access_token)).await;
    assert_envelope!(unsubscribed, 200, "Unsubscribed");
    let subscribers = app.get(&uri, Some(&channel.access_token)).await;
    assert!(subscribers.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_healthcheck() {
    let app = TestApp::new();
    let response = app.get("/api/v1/healthcheck", None).await;
    assert_envelope!(response, 200, "Healthcheck passed");
    assert_eq!(response.data()["status"], "OK");
}
