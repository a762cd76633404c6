//! LinkedIn REST v1: the member's own shares from the network-updates feed.
pub mod client;
pub mod extract;
pub mod types;

pub use client::LinkedinApi;
pub use extract::extract_updates;
