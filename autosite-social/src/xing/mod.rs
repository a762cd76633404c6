//! XING REST v1: posts from the member's network feed.
pub mod client;
pub mod extract;
pub mod types;

pub use client::XingApi;
pub use extract::extract_feed;
