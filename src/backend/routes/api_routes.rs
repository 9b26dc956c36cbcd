/**
 * API Route Handlers
 *
 * This module wires every `/api/v1` resource to its handlers. Each resource
 * has a public part and a protected part; the protected part is wrapped in
 * `auth_middleware` with `route_layer`, so unknown paths still fall through
 * to the 404 fallback instead of answering 401.
 *
 * # Routes
 *
 * ## Users (`/users`)
 * - `POST /register`, `POST /login`, `POST /refresh-token`
 * - Protected: `POST /logout`, `POST /change-password`, `GET /current-user`,
 *   `PATCH /update-account`, `PATCH /avatar`, `PATCH /cover-image`,
 *   `GET /c/{username}`, `GET /history`
 *
 * ## Videos (`/videos`)
 * - `GET /`, `GET /user/{userId}`
 * - Protected: `POST /`, `GET|PATCH|DELETE /{videoId}`,
 *   `PATCH /toggle/publish/{videoId}`
 *
 * ## Comments (`/comments`)
 * - `GET /{videoId}`
 * - Protected: `POST /{videoId}`, `PATCH|DELETE /c/{commentId}`
 *
 * ## Likes (`/likes`), all protected
 * - `POST /toggle/v/{videoId}`, `POST /toggle/c/{commentId}`,
 *   `POST /toggle/t/{tweetId}`, `GET /videos`
 *
 * ## Subscriptions (`/subscriptions`), all protected
 * - `POST|GET /c/{channelId}`, `GET /u/{subscriberId}`
 *
 * ## Playlists (`/playlists`)
 * - `GET /{playlistId}`, `GET /user/{userId}`
 * - Protected: `POST /`, `PATCH|DELETE /{playlistId}`,
 *   `PATCH /add/{videoId}/{playlistId}`, `PATCH /remove/{videoId}/{playlistId}`
 *
 * ## Healthcheck
 * - `GET /healthcheck`
 */

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::backend::auth::handlers as users;
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::{comments, healthcheck, likes, playlists, subscriptions, videos};

/// Require a valid access token on every route of `router`
fn protected(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh-token", post(users::refresh_token));

    let private = Router::new()
        .route("/logout", post(users::logout))
        .route("/change-password", post(users::change_password))
        .route("/current-user", get(users::current_user))
        .route("/update-account", patch(users::update_account))
        .route("/avatar", patch(users::update_avatar))
        .route("/cover-image", patch(users::update_cover_image))
        .route("/c/{username}", get(users::channel_profile))
        .route("/history", get(users::watch_history));

    public.merge(protected(state, private))
}

fn video_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(videos::list_videos))
        .route("/user/{userId}", get(videos::user_videos));

    let private = Router::new()
        .route("/", post(videos::publish_video))
        .route(
            "/{videoId}",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/toggle/publish/{videoId}", patch(videos::toggle_publish_status));

    public.merge(protected(state, private))
}

fn comment_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/{videoId}", get(comments::list_comments));

    let private = Router::new()
        .route("/{videoId}", post(comments::add_comment))
        .route(
            "/c/{commentId}",
            patch(comments::update_comment).delete(comments::delete_comment),
        );

    public.merge(protected(state, private))
}

fn like_routes(state: &AppState) -> Router<AppState> {
    protected(
        state,
        Router::new()
            .route("/toggle/v/{videoId}", post(likes::toggle_video_like))
            .route("/toggle/c/{commentId}", post(likes::toggle_comment_like))
            .route("/toggle/t/{tweetId}", post(likes::toggle_tweet_like))
            .route("/videos", get(likes::liked_videos)),
    )
}

fn subscription_routes(state: &AppState) -> Router<AppState> {
    protected(
        state,
        Router::new()
            .route(
                "/c/{channelId}",
                post(subscriptions::toggle_subscription).get(subscriptions::channel_subscribers),
            )
            .route("/u/{subscriberId}", get(subscriptions::subscribed_channels)),
    )
}

fn playlist_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/{playlistId}", get(playlists::get_playlist))
        .route("/user/{userId}", get(playlists::user_playlists));

    let private = Router::new()
        .route("/", post(playlists::create_playlist))
        .route(
            "/{playlistId}",
            patch(playlists::update_playlist).delete(playlists::delete_playlist),
        )
        .route("/add/{videoId}/{playlistId}", patch(playlists::add_video_to_playlist))
        .route("/remove/{videoId}/{playlistId}", patch(playlists::remove_video_from_playlist));

    public.merge(protected(state, private))
}

/// Configure the versioned API
///
/// Returns a router meant to be nested under `/api/v1`.
pub fn configure_api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(healthcheck::healthcheck))
        .nest("/users", user_routes(state))
        .nest("/videos", video_routes(state))
        .nest("/comments", comment_routes(state))
        .nest("/likes", like_routes(state))
        .nest("/subscriptions", subscription_routes(state))
        .nest("/playlists", playlist_routes(state))
}
