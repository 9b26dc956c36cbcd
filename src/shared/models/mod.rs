//! Entity Records
//!
//! Typed records for every collection the store keeps, plus the validated
//! `New*` inputs and `*Patch` field-level updates that are the only way to
//! create or mutate them.
//!
//! ```text
//! models/
//! ├── user.rs         - User (also a channel)
//! ├── video.rs        - Video, sort options
//! ├── comment.rs      - Comment
//! ├── like.rs         - Like and its target
//! ├── subscription.rs - Subscription
//! └── playlist.rs     - Playlist
//! ```

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod user;
pub mod video;

pub use comment::{Comment, NewComment};
pub use like::{Like, LikeRow, LikeTarget};
pub use playlist::{NewPlaylist, Playlist, PlaylistPatch};
pub use subscription::Subscription;
pub use user::{NewUser, User, UserPatch};
pub use video::{NewVideo, SortDirection, Video, VideoListQuery, VideoPatch, VideoSortField};
