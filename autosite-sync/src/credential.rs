//! Stored OAuth material for one network.
use autosite_common::AutositeError;
use autosite_config::NetworkSpec;
use autosite_http::OAuth1Credentials;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Lowercase network key (`twitter`, `github`, ...).
    pub network: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub secret: String,
    pub token_expiry: Option<DateTime<Utc>>,
    pub request_url: String,
    pub auth_url: String,
    pub access_url: String,
    pub repost: bool,
    pub api_base: Option<String>,
}

impl Credential {
    /// OAuth 1.0a networks are the ones with a request-token endpoint.
    pub fn is_oauth1(&self) -> bool {
        !self.request_url.trim().is_empty()
    }

    /// Whether the token can be used at `now`.
    pub fn check_usable(&self, now: DateTime<Utc>) -> Result<(), AutositeError> {
        if self.token.trim().is_empty() {
            return Err(AutositeError::CredentialUnusable {
                network: self.network.clone(),
                reason: "no access token".into(),
            });
        }
        match self.token_expiry {
            Some(expiry) if expiry <= now => Err(AutositeError::CredentialUnusable {
                network: self.network.clone(),
                reason: format!("token expired at {}", expiry.to_rfc3339()),
            }),
            _ => Ok(()),
        }
    }

    pub fn oauth1(&self) -> OAuth1Credentials {
        OAuth1Credentials {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            token: self.token.clone(),
            token_secret: self.secret.clone(),
        }
    }

    /// API host for this network: the stored override, else `default`.
    pub fn base_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.api_base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(default)
    }
}

impl From<&NetworkSpec> for Credential {
    fn from(spec: &NetworkSpec) -> Self {
        Self {
            network: spec.name.trim().to_ascii_lowercase(),
            consumer_key: spec.consumer_key.clone(),
            consumer_secret: spec.consumer_secret.clone(),
            token: spec.token.clone(),
            secret: spec.secret.clone(),
            token_expiry: spec.token_expiry,
            request_url: spec.request_url.clone(),
            auth_url: spec.auth_url.clone(),
            access_url: spec.access_url.clone(),
            repost: spec.repost,
            api_base: spec.api_base.clone(),
        }
    }
}
