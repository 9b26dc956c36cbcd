//! Property-based tests

pub mod pagination_proptest;
pub mod toggle_proptest;
