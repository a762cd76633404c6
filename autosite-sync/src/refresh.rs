//! One refresh pass over every stored credential.
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use autosite_common::Network;
use autosite_config::AutositeConfig;
use autosite_social::CrossPost;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::crosspost::{CrossPostOutcome, CrossPoster};
use crate::fetch::{FetchContext, fetcher_for};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Number of status updates kept after the pass.
    pub retention: u32,
    pub own_source_suffix: String,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            retention: 100,
            own_source_suffix: "autosite</a>".into(),
        }
    }
}

impl From<&AutositeConfig> for RefreshSettings {
    fn from(cfg: &AutositeConfig) -> Self {
        Self {
            retention: cfg.retention,
            own_source_suffix: cfg.own_source_suffix.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RefreshReport {
    pub warnings: Vec<String>,
    /// Updates stored per network, in the order networks were fetched.
    pub stored: Vec<(Network, usize)>,
    pub crossposts: Vec<CrossPostOutcome>,
    pub trimmed: u64,
}

impl RefreshReport {
    pub fn total_stored(&self) -> usize {
        self.stored.iter().map(|(_, n)| n).sum()
    }

    fn warn(&mut self, message: String) {
        warn!(%message, "sync.refresh.warning");
        self.warnings.push(message);
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        for (network, n) in &self.stored {
            writeln!(f, "{}: {n} new", network.title())?;
        }
        for outcome in &self.crossposts {
            writeln!(f, "twitter: {outcome}")?;
        }
        write!(
            f,
            "Updated: {} new, {} trimmed",
            self.total_stored(),
            self.trimmed
        )
    }
}

pub async fn refresh(store: &Store, settings: &RefreshSettings) -> Result<RefreshReport> {
    refresh_at(store, settings, Utc::now()).await
}

/// Run every usable fetcher, cross-post what they nominate, then trim the timeline.
///
/// Per-network failures are collected as warnings; only store errors outside a fetch
/// abort the pass.
pub async fn refresh_at(
    store: &Store,
    settings: &RefreshSettings,
    now: DateTime<Utc>,
) -> Result<RefreshReport> {
    let mut report = RefreshReport::default();
    let mut candidates: Vec<CrossPost> = Vec::new();

    for credential in store.credentials().await? {
        if let Err(e) = credential.check_usable(now) {
            report.warn(e.to_string());
            continue;
        }
        let network = match Network::from_str(&credential.network) {
            Ok(n) => n,
            Err(e) => {
                report.warn(e.to_string());
                continue;
            }
        };

        let fetcher = fetcher_for(network);
        let ctx = FetchContext {
            store,
            credential: &credential,
            own_source_suffix: &settings.own_source_suffix,
        };
        match fetcher.fetch(&ctx).await {
            Ok(outcome) => {
                report.stored.push((fetcher.network(), outcome.stored));
                if credential.repost {
                    candidates.extend(outcome.crossposts);
                }
            }
            Err(e) => report.warn(format!("{network}: {e:#}")),
        }
    }

    if !candidates.is_empty() {
        match store.credential(Network::Twitter.as_str()).await? {
            Some(twitter) => match CrossPoster::new(&twitter, now) {
                Ok(poster) => report.crossposts = poster.post_all(&candidates).await,
                Err(e) => report.warn(format!(
                    "twitter: {e}; dropped {} cross-post(s)",
                    candidates.len()
                )),
            },
            None => report.warn(format!(
                "twitter: no credential stored; dropped {} cross-post(s)",
                candidates.len()
            )),
        }
    }

    report.trimmed = store.trim(settings.retention).await?;
    info!(
        stored = report.total_stored(),
        crossposts = report.crossposts.len(),
        warnings = report.warnings.len(),
        trimmed = report.trimmed,
        "sync.refresh.done"
    );
    Ok(report)
}
