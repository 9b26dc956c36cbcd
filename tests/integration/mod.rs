//! End-to-end API tests against the in-memory application

pub mod playlists_test;
pub mod social_test;
pub mod users_test;
pub mod videos_test;
