//! Minimal wrapper around the Twitter v1.1 timeline and update endpoints.
use std::borrow::Cow;

use autosite_http::{Auth, HttpClient, HttpError, OAuth1Credentials, RequestOpts};

use crate::twitter::types::{PostedTweet, Tweet};

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    creds: OAuth1Credentials,
}

impl TwitterApi {
    pub const DEFAULT_BASE: &'static str = "https://api.twitter.com";

    pub fn new(base: &str, creds: OAuth1Credentials) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            creds,
        })
    }

    /// Tweets of the authenticating user, newest first.
    pub async fn user_timeline(&self, since_id: Option<i64>) -> Result<Vec<Tweet>, HttpError> {
        let query = since_id.map(|id| vec![("since_id", Cow::Owned(id.to_string()))]);
        let tweets: Vec<Tweet> = self
            .http
            .get_json(
                "1.1/statuses/user_timeline.json",
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.creds)),
                    query,
                    ..Default::default()
                },
            )
            .await?;
        tracing::debug!(count = tweets.len(), ?since_id, "twitter.timeline.fetched");
        Ok(tweets)
    }

    pub async fn update_status(&self, status: &str) -> Result<PostedTweet, HttpError> {
        let posted: PostedTweet = self
            .http
            .post_form_json(
                "1.1/statuses/update.json",
                &[("status", status)],
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.creds)),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(id = %posted.id_str, "twitter.status.posted");
        Ok(posted)
    }
}
