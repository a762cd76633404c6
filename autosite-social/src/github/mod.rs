//! GitHub REST: the authenticated user's public event stream.
pub mod client;
pub mod extract;
pub mod types;

pub use client::GithubApi;
pub use extract::{extract_events, short_repo_name};
