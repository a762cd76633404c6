//! Bearer-authenticated access to the GitHub REST API.
use autosite_http::{Auth, HttpClient, HttpError, RequestOpts};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, IF_MODIFIED_SINCE};
use serde_json::Value;

use crate::github::types::{GithubUser, RawEvent};

#[derive(Clone)]
pub struct GithubApi {
    http: HttpClient,
    token: String,
}

/// RFC 7231 HTTP-date, always in GMT.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

impl GithubApi {
    pub const DEFAULT_BASE: &'static str = "https://api.github.com";

    pub fn new(base: &str, token: String) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            token,
        })
    }

    fn headers(if_modified_since: Option<DateTime<Utc>>) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(at) = if_modified_since {
            let value = HeaderValue::from_str(&http_date(at))
                .map_err(|e| HttpError::Build(e.to_string()))?;
            headers.insert(IF_MODIFIED_SINCE, value);
        }
        Ok(headers)
    }

    /// The account the token belongs to. `HttpError::NotModified` when unchanged.
    pub async fn authenticated_user(
        &self,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<GithubUser, HttpError> {
        self.http
            .get_json(
                "user",
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.token)),
                    headers: Some(Self::headers(if_modified_since)?),
                    ..Default::default()
                },
            )
            .await
    }

    /// Public events performed by `login`, newest first. Entries that do not
    /// decode are dropped one by one.
    pub async fn user_events(
        &self,
        login: &str,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawEvent>, HttpError> {
        let raw: Vec<Value> = self
            .http
            .get_json(
                &format!("users/{login}/events"),
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.token)),
                    headers: Some(Self::headers(if_modified_since)?),
                    ..Default::default()
                },
            )
            .await?;
        let received = raw.len();
        let events = RawEvent::decode_all(raw);
        tracing::debug!(login, received, count = events.len(), "github.events.fetched");
        Ok(events)
    }
}
