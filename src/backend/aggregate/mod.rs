//! Relationship Aggregator
//!
//! Typed join recipes producing the read-side views served by the API.
//!
//! # Module Structure
//!
//! ```text
//! aggregate/
//! ├── mod.rs     - Module exports
//! ├── lookup.rs  - Lookup index, join and collapse
//! ├── views.rs   - Joined view types (VideoWithOwner, ChannelProfile, ...)
//! └── recipes.rs - Named recipes over `dyn EntityStore`
//! ```

pub mod lookup;
pub mod recipes;
pub mod views;

pub use lookup::{collapse, Lookup};
pub use views::{
    ChannelProfile, CommentWithOwner, LikedVideo, OwnerSummary, PlaylistWithVideos,
    SubscribedChannel, SubscriberEntry, VideoWithOwner,
};
