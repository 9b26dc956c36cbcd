//! Comments
//!
//! Routes under `/api/v1/comments`. Only a comment's author may edit or
//! delete it.

pub mod handlers;

pub use handlers::{add_comment, delete_comment, list_comments, update_comment};
