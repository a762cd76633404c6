//! Republishing of repost candidates as Twitter statuses.
use std::fmt;

use anyhow::Result;
use autosite_social::CrossPost;
use autosite_social::twitter::TwitterApi;
use chrono::{DateTime, Utc};

use crate::credential::Credential;

/// Messages longer than this are shortened before posting.
pub const MAX_MESSAGE_CHARS: usize = 119;
const TRUNCATED_CHARS: usize = 115;
const ELLIPSIS: &str = "...";

/// Build the status text: the (possibly truncated) message, then ` <link>`.
///
/// ```
/// use autosite_social::CrossPost;
/// use autosite_sync::crosspost::compose_status;
///
/// let post = CrossPost::new("I shared a link", Some("https://example.com".into()));
/// assert_eq!(compose_status(&post), "I shared a link https://example.com");
/// ```
pub fn compose_status(post: &CrossPost) -> String {
    let mut status = if post.message.chars().count() > MAX_MESSAGE_CHARS {
        let mut cut: String = post.message.chars().take(TRUNCATED_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        post.message.clone()
    };
    if let Some(link) = post.link.as_deref().filter(|l| !l.is_empty()) {
        status.push(' ');
        status.push_str(link);
    }
    status
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossPostOutcome {
    Posted { status: String, id: String },
    Failed { status: String, error: String },
}

impl CrossPostOutcome {
    pub fn is_posted(&self) -> bool {
        matches!(self, CrossPostOutcome::Posted { .. })
    }
}

impl fmt::Display for CrossPostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossPostOutcome::Posted { status, id } => write!(f, "posted {id}: {status}"),
            CrossPostOutcome::Failed { status, error } => {
                write!(f, "failed: {status} ({error})")
            }
        }
    }
}

pub struct CrossPoster {
    api: TwitterApi,
}

impl CrossPoster {
    /// Poster for the stored Twitter credential, which must be usable at `now`.
    pub fn new(twitter: &Credential, now: DateTime<Utc>) -> Result<Self> {
        twitter.check_usable(now)?;
        let api = TwitterApi::new(twitter.base_or(TwitterApi::DEFAULT_BASE), twitter.oauth1())?;
        Ok(Self { api })
    }

    /// Post `candidates` (newest first) oldest first. A failed post does not stop the rest.
    pub async fn post_all(&self, candidates: &[CrossPost]) -> Vec<CrossPostOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates.iter().rev() {
            let status = compose_status(candidate);
            let outcome = match self.api.update_status(&status).await {
                Ok(posted) => CrossPostOutcome::Posted {
                    status,
                    id: posted.id_str,
                },
                Err(e) => {
                    tracing::warn!(error = %e, %status, "sync.crosspost.failed");
                    CrossPostOutcome::Failed {
                        status,
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
