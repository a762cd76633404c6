//! Normalization of the user timeline into status updates.
use std::sync::LazyLock;

use autosite_common::Network;
use chrono::{DateTime, Utc};
use regex::Regex;

use crate::StatusUpdate;
use crate::twitter::types::Tweet;

const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" https?://[A-Za-z0-9./-]*").expect("static link regex"));

/// Split a tweet's text into its heading and the first space-prefixed link.
///
/// ```
/// use autosite_social::twitter::split_link;
///
/// let (heading, link) = split_link("New post http://t.co/abc up");
/// assert_eq!(heading, "New post up");
/// assert_eq!(link.as_deref(), Some("http://t.co/abc"));
/// ```
pub fn split_link(text: &str) -> (String, Option<String>) {
    let link = LINK_RE
        .find(text)
        .map(|m| m.as_str().trim_start().to_string());
    let mut heading = LINK_RE.replace_all(text, "").into_owned();
    if let Some(link) = link.as_deref().filter(|l| !l.is_empty()) {
        heading = heading.replace(link, "");
    }
    (heading.trim().to_string(), link)
}

pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map timeline tweets to status updates.
///
/// Tweets posted by this system (their `source` ends with `own_source_suffix`) and
/// tweets at or below `since_id` are skipped, as are tweets with unusable ids or dates.
pub fn extract_timeline(
    tweets: Vec<Tweet>,
    own_source_suffix: &str,
    since_id: Option<i64>,
) -> Vec<StatusUpdate> {
    let mut out = Vec::with_capacity(tweets.len());
    for tweet in tweets {
        let own = !own_source_suffix.is_empty()
            && tweet
                .source
                .as_deref()
                .is_some_and(|s| s.ends_with(own_source_suffix));
        if own {
            continue;
        }

        let Ok(id) = tweet.id_str.parse::<i64>() else {
            tracing::debug!(id = %tweet.id_str, "twitter.extract.bad_id");
            continue;
        };
        if since_id.is_some_and(|mark| id <= mark) {
            continue;
        }
        let Some(created) = parse_created_at(&tweet.created_at) else {
            tracing::debug!(id, created_at = %tweet.created_at, "twitter.extract.bad_date");
            continue;
        };

        let (heading, link) = split_link(&tweet.text);
        let screen_name = tweet.user.screen_name;
        out.push(StatusUpdate {
            network: Network::Twitter,
            origin_id: id,
            heading,
            content: None,
            link,
            created,
            author_url: format!("https://twitter.com/{screen_name}"),
            author: screen_name,
        });
    }
    out
}
