//! Twitter REST v1.1: the account's own timeline in, cross-posted statuses out.
//!
//! Requests are signed with OAuth 1.0a using the stored consumer and access tokens.
pub mod client;
pub mod extract;
pub mod types;

pub use client::TwitterApi;
pub use extract::{extract_timeline, split_link};
