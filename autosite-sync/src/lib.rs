//! Refresh pipeline for autosite: stored credentials in, normalized timeline out.
//!
//! - [`store::Store`]: SQLite persistence for credentials and status updates
//! - [`fetch`]: one fetcher per network, each reading its high-water mark first
//! - [`crosspost`]: shortening and posting repost candidates to Twitter
//! - [`refresh`]: the orchestrating pass and its plain-text report
pub mod credential;
pub mod crosspost;
pub mod fetch;
pub mod refresh;
pub mod store;

pub use credential::Credential;
pub use crosspost::{CrossPostOutcome, CrossPoster, compose_status};
pub use refresh::{RefreshReport, RefreshSettings, refresh, refresh_at};
pub use store::Store;
