//! Social network clients and normalizers used by autosite.
//!
//! Each network module pairs a thin API wrapper over [`autosite_http::HttpClient`] with
//! strongly typed response models and a pure `extract` step. The extractors turn a
//! decoded feed into [`StatusUpdate`] records plus optional [`CrossPost`] candidates;
//! persistence and high-water-mark lookups happen in `autosite-sync`.
use autosite_common::Network;
use chrono::{DateTime, Utc};

pub mod github;
pub mod linkedin;
pub mod twitter;
pub mod xing;

/// One normalized feed item, regardless of which network it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub network: Network,
    /// The network's own id, or a timestamp for networks that lack one.
    pub origin_id: i64,
    pub heading: String,
    pub content: Option<String>,
    pub link: Option<String>,
    pub created: DateTime<Utc>,
    pub author: String,
    pub author_url: String,
}

impl StatusUpdate {
    pub fn network_title(&self) -> &'static str {
        self.network.title()
    }
}

/// A short message to republish on Twitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossPost {
    pub message: String,
    pub link: Option<String>,
}

impl CrossPost {
    pub fn new(message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            message: message.into(),
            link,
        }
    }
}

/// Output of one extraction pass, in feed order (newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    pub updates: Vec<StatusUpdate>,
    pub crossposts: Vec<CrossPost>,
}

pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
