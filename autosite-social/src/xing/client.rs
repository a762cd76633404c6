use std::borrow::Cow;

use autosite_http::{Auth, HttpClient, HttpError, RequestOpts};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::xing::types::Feed;

#[derive(Clone)]
pub struct XingApi {
    http: HttpClient,
    token: String,
}

impl XingApi {
    pub const DEFAULT_BASE: &'static str = "https://api.xing.com";

    pub fn new(base: &str, token: String) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            token,
        })
    }

    /// Network feed of the authenticated member, optionally limited to activities after `since`.
    pub async fn feed(&self, since: Option<DateTime<Utc>>) -> Result<Feed, HttpError> {
        let query = since.map(|at| {
            vec![(
                "since",
                Cow::Owned(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            )]
        });
        let feed: Feed = self
            .http
            .get_json(
                "v1/users/me/feed",
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.token)),
                    query,
                    ..Default::default()
                },
            )
            .await?;
        tracing::debug!(groups = feed.network_activities.len(), ?since, "xing.feed.fetched");
        Ok(feed)
    }
}
