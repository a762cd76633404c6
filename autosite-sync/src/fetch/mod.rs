//! Per-network fetchers: read the high-water mark, call the API, normalize, persist.
use anyhow::Result;
use async_trait::async_trait;
use autosite_common::Network;
use autosite_social::{CrossPost, StatusUpdate};

use crate::credential::Credential;
use crate::store::Store;

mod github;
mod linkedin;
mod twitter;
mod xing;

pub use github::GithubFetcher;
pub use linkedin::LinkedinFetcher;
pub use twitter::TwitterFetcher;
pub use xing::XingFetcher;

/// Inputs shared by every fetcher for one refresh.
pub struct FetchContext<'a> {
    pub store: &'a Store,
    pub credential: &'a Credential,
    /// Source suffix identifying tweets this system posted.
    pub own_source_suffix: &'a str,
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub stored: usize,
    /// Repost candidates in feed order, newest first.
    pub crossposts: Vec<CrossPost>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    fn network(&self) -> Network;

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<FetchOutcome>;
}

pub fn fetcher_for(network: Network) -> Box<dyn Fetcher> {
    match network {
        Network::Twitter => Box::new(TwitterFetcher),
        Network::Github => Box::new(GithubFetcher),
        Network::Linkedin => Box::new(LinkedinFetcher),
        Network::Xing => Box::new(XingFetcher),
    }
}

/// Store `updates` (given newest first) oldest first, so insertion order follows time.
pub(crate) async fn persist(store: &Store, updates: &[StatusUpdate]) -> Result<usize> {
    for update in updates.iter().rev() {
        store.insert_status(update).await?;
    }
    Ok(updates.len())
}
