//! Minimal HTTP client with safe logging and the auth flavours the social APIs need.
//!
//! - Request options: headers, [`Auth`], query params, timeout
//! - OAuth 1.0a (HMAC-SHA1) signing for form and query parameters
//! - Redacts sensitive query params and never logs secret values
//! - `304 Not Modified` surfaces as [`HttpError::NotModified`] so conditional GETs
//!   can tell "nothing new" apart from failures
//! - Optional *raw* request/response logging via `AUTOSITE_HTTP_RAW=1`
//!
//! One attempt per call: a failed request goes straight back to the caller, which
//! decides what to do with it.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), autosite_http::HttpError> {
//! let client = autosite_http::HttpClient::new("https://api.github.com")?;
//! let got: serde_json::Value = client
//!     .get_json("user", autosite_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

mod oauth1;

pub use oauth1::OAuth1Credentials;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

const RAW_ENV: &str = "AUTOSITE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const USER_AGENT: &str = concat!("autosite/", env!("CARGO_PKG_VERSION"));

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "oauth2_access_token"
            | "oauth_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

fn redact_query(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| {
            let secret = is_secret_param(&k);
            (
                k.into_owned(),
                if secret {
                    "<redacted>".to_string()
                } else {
                    v.into_owned()
                },
            )
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("not modified")]
    NotModified,
}

/// Authentication strategies supported by the HTTP client.
///
/// ```
/// use autosite_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// match bearer {
///     Auth::Bearer(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Auth via query param (LinkedIn's `oauth2_access_token`)
    Query {
        name: &'a str,
        value: Cow<'a, str>,
    },
    /// Signed OAuth 1.0a request
    OAuth1(&'a OAuth1Credentials),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Query { .. } => "query",
            Auth::OAuth1(_) => "oauth1",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use autosite_http::{Auth, RequestOpts};
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Query {
///         name: "oauth2_access_token",
///         value: Cow::Borrowed("demo"),
///     }),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

enum Body<'b> {
    Empty,
    Form(&'b [(&'b str, &'b str)]),
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use autosite_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.xing.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, Body::Empty, opts).await
    }

    /// POST an `application/x-www-form-urlencoded` body and decode a JSON reply.
    ///
    /// Form fields take part in the OAuth 1.0a signature when [`Auth::OAuth1`] is used.
    pub async fn post_form_json<T>(
        &self,
        path: &str,
        form: &[(&str, &str)],
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Body::Form(form), opts)
            .await
    }

    fn resolve(&self, path: &str, opts: &RequestOpts<'_>) -> Result<Url, HttpError> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let mut extra: Vec<(&str, &str)> = opts
            .query
            .iter()
            .flatten()
            .map(|(k, v)| (*k, v.as_ref()))
            .collect();
        if let Some(Auth::Query { name, value }) = &opts.auth {
            extra.push((*name, value.as_ref()));
        }
        if !extra.is_empty() {
            url.query_pairs_mut().extend_pairs(extra);
        }
        Ok(url)
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        body: Body<'_>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path, &opts)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout);

        let form_pairs: Vec<(String, String)> = match &body {
            Body::Empty => Vec::new(),
            Body::Form(fields) => fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        };
        let request_body = match &body {
            Body::Empty => None,
            Body::Form(_) => {
                let encoded = oauth1::form_body(&form_pairs);
                rb = rb
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded.clone());
                Some(encoded)
            }
        };

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        match &opts.auth {
            Some(Auth::Bearer(tok)) => {
                let tok = sanitize_api_key(tok)?;
                rb = rb.bearer_auth(tok);
            }
            Some(Auth::OAuth1(creds)) => {
                let header = oauth1::authorization_header(creds, &method, &url, &form_pairs);
                rb = rb.header(AUTHORIZATION, header);
            }
            Some(Auth::Query { .. }) | Some(Auth::None) | None => {}
        }

        let req_id = format!("r{:x}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?redact_query(&url),
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            has_body=%request_body.is_some(),
            "http.request.start"
        );

        if raw_enabled() {
            let headers = opts.headers.as_ref().map(redact_headers).unwrap_or_default();
            let mut body = request_body.clone().unwrap_or_default();
            body.truncate(RAW_MAX_BODY);
            tracing::debug!(
                target: "http.raw",
                %req_id,
                %method,
                query=?redact_query(&url),
                headers=?headers,
                body=%body,
                "request"
            );
        }

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let limit = headers
            .get("x-rate-limit-remaining")
            .or_else(|| headers.get("x-ratelimit-remaining"))
            .and_then(|v| v.to_str().ok());

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            rate_limit.remaining=?limit,
            "http.response.headers"
        );

        if raw_enabled() {
            let mut body_snip = bytes.to_vec();
            let truncated = body_snip.len() > RAW_MAX_BODY;
            body_snip.truncate(RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body=%String::from_utf8_lossy(&body_snip),
                truncated
            );
        }

        let snippet = snip_body(&bytes);

        if status == StatusCode::NOT_MODIFIED {
            tracing::debug!(req_id=%req_id, "http.not_modified");
            return Err(HttpError::NotModified);
        }

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

/// Pull a human-readable message out of the error envelopes the networks use.
fn extract_error_message(body: &[u8]) -> String {
    // Twitter: {"errors":[{"message":"...","code":..}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        message: String,
    }

    // GitHub / LinkedIn / XING: {"message":"..."} or {"error_name":"...","message":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error_name: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().find(|e| !e.message.is_empty()) {
            return first.message;
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        match (m.error_name.is_empty(), m.message.is_empty()) {
            (false, false) => return format!("{}: {}", m.error_name, m.message),
            (_, false) => return m.message,
            (false, true) => return m.error_name,
            (true, true) if !m.error.is_empty() => return m.error,
            _ => {}
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("token contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("token contains control characters".into()));
    }
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
