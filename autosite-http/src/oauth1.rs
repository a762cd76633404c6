//! OAuth 1.0a request signing (HMAC-SHA1), as required by Twitter's v1.1 API.
//!
//! Only the signing of a request with already-issued credentials lives here; the
//! three-legged handshake that produces the token is handled elsewhere.
use oauth1_request as oauth;
use oauth1_request::request::ParameterList;
use oauth_credentials::Credentials;
use reqwest::{Method, Url};
use std::num::NonZeroU64;

/// Consumer and access-token pair used to sign a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl OAuth1Credentials {
    pub fn client(&self) -> Credentials<&str> {
        Credentials::new(&self.consumer_key, &self.consumer_secret)
    }

    pub fn token(&self) -> Credentials<&str> {
        Credentials::new(&self.token, &self.token_secret)
    }
}

/// Sorted parameter list covering every query pair of `url` plus `form`.
fn signed_params(url: &Url, form: &[(String, String)]) -> ParameterList<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .chain(form.iter().cloned())
        .collect()
}

/// `application/x-www-form-urlencoded` body using the OAuth percent-encoding.
pub(crate) fn form_body(form: &[(String, String)]) -> String {
    let params: ParameterList<String, String> = form.iter().cloned().collect();
    oauth::to_form(&params)
}

fn build_header(
    creds: &OAuth1Credentials,
    method: &Method,
    url: &Url,
    form: &[(String, String)],
    nonce: Option<&str>,
    timestamp: Option<NonZeroU64>,
) -> String {
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    let params = signed_params(url, form);

    let mut builder = oauth::Builder::<_, _>::new(creds.client(), oauth::HMAC_SHA1);
    builder
        .token(creds.token())
        .nonce(nonce)
        .timestamp(timestamp)
        .version(true);
    builder.authorize(method.as_str(), endpoint.as_str(), &params)
}

/// Compute the `Authorization: OAuth ...` header value with a fixed nonce and timestamp.
#[cfg(test)]
pub(crate) fn authorization_header_with(
    creds: &OAuth1Credentials,
    method: &Method,
    url: &Url,
    form: &[(String, String)],
    nonce: &str,
    timestamp: NonZeroU64,
) -> String {
    build_header(creds, method, url, form, Some(nonce), Some(timestamp))
}

/// Compute the `Authorization: OAuth ...` header value for one request.
///
/// `url` carries the final query string; `form` holds the body fields.
pub(crate) fn authorization_header(
    creds: &OAuth1Credentials,
    method: &Method,
    url: &Url,
    form: &[(String, String)],
) -> String {
    build_header(creds, method, url, form, None, None)
}
