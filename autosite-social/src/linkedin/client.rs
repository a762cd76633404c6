use std::borrow::Cow;

use autosite_http::{Auth, HttpClient, HttpError, RequestOpts};

use crate::linkedin::types::NetworkUpdates;

/// LinkedIn v1 client; the OAuth2 token travels as the `oauth2_access_token` query param.
#[derive(Clone)]
pub struct LinkedinApi {
    http: HttpClient,
    token: String,
}

impl LinkedinApi {
    pub const DEFAULT_BASE: &'static str = "https://api.linkedin.com";

    pub fn new(base: &str, token: String) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            token,
        })
    }

    /// Shares by the member, optionally only those after `after` (ms timestamp).
    pub async fn own_shares(&self, after: Option<i64>) -> Result<NetworkUpdates, HttpError> {
        let mut query: Vec<(&str, Cow<'_, str>)> = vec![
            ("type", "SHAR".into()),
            ("scope", "self".into()),
            ("format", "json".into()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string().into()));
        }

        let updates: NetworkUpdates = self
            .http
            .get_json(
                "v1/people/~/network/updates",
                RequestOpts {
                    auth: Some(Auth::Query {
                        name: "oauth2_access_token",
                        value: Cow::Borrowed(self.token.as_str()),
                    }),
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;
        tracing::debug!(total = updates.total, ?after, "linkedin.updates.fetched");
        Ok(updates)
    }
}
