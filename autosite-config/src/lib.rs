//! Loader for autosite configuration with YAML + environment overlays.
//!
//! Sources are merged in order: files/snippets first, then `AUTOSITE__`-prefixed
//! environment variables (`AUTOSITE__RETENTION=50`). String values may reference
//! `${VAR}` placeholders, expanded after the merge.
//!
//! ```yaml
//! database_url: "sqlite://autosite.db"
//! retention: 100
//! networks:
//!   - name: twitter
//!     consumer_key: "${TWITTER_CONSUMER_KEY}"
//!     consumer_secret: "${TWITTER_CONSUMER_SECRET}"
//!     token: "${TWITTER_TOKEN}"
//!     secret: "${TWITTER_TOKEN_SECRET}"
//!     request_url: "https://api.twitter.com/oauth/request_token"
//!   - name: github
//!     token: "${GITHUB_TOKEN}"
//!     repost: true
//! ```
use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct AutositeConfig {
    pub version: Option<String>,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Number of status updates kept after each refresh.
    #[serde(default = "default_retention")]
    pub retention: u32,
    /// Tweets whose `source` ends with this were cross-posted by us and are not re-ingested.
    #[serde(default = "default_own_source_suffix")]
    pub own_source_suffix: String,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub networks: Vec<NetworkSpec>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub stderr: bool,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Stored credentials for one network.
///
/// OAuth1 networks carry a `request_url`; OAuth2 networks leave it empty and use
/// `token` as the bearer token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub token_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub request_url: String,
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub access_url: String,
    #[serde(default)]
    pub repost: bool,
    /// Overrides the network's public API host (used by tests and proxies).
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_database_url() -> String {
    "sqlite://autosite.db".into()
}
fn default_retention() -> u32 {
    100
}
fn default_own_source_suffix() -> String {
    "autosite</a>".into()
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("network entry #{index} has no name")]
    UnnamedNetwork { index: usize },
    #[error("network `{0}` is configured more than once")]
    DuplicateNetwork(String),
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &AutositeConfig) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for (index, net) in cfg.networks.iter().enumerate() {
        let name = net.name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(LoadError::UnnamedNetwork { index });
        }
        if !seen.insert(name.clone()) {
            return Err(LoadError::DuplicateNetwork(name));
        }
    }
    Ok(())
}

/// Builder over the `config` crate wiring (YAML + env overrides).
pub struct AutositeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for AutositeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AutositeConfigLoader {
    /// ```
    /// use autosite_config::AutositeConfigLoader;
    ///
    /// let config = AutositeConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nnetworks: []")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.retention, 100);
    /// assert!(config.networks.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but a missing file is skipped, so a
    /// deployment can run from environment variables alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use autosite_config::AutositeConfigLoader;
    ///
    /// let cfg = AutositeConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// retention: 25
    /// networks:
    ///   - name: github
    ///     token: "abc"
    ///     repost: true
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.retention, 25);
    /// assert_eq!(cfg.networks[0].name, "github");
    /// assert!(cfg.networks[0].repost);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge the sources, expand `${VAR}` placeholders and materialise typed config.
    ///
    /// Environment variables are layered last so they win over files.
    pub fn load(self) -> Result<AutositeConfig, LoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("AUTOSITE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: AutositeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}
