//! Videos
//!
//! Routes under `/api/v1/videos`. Listing is public and paginated twelve to
//! a page; watching a video appends it to the caller's watch history.

pub mod handlers;

pub use handlers::{
    delete_video, get_video, list_videos, publish_video, toggle_publish_status, update_video,
    user_videos,
};
