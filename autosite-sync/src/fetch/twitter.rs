use anyhow::{Context, Result};
use async_trait::async_trait;
use autosite_common::Network;
use autosite_social::twitter::{TwitterApi, extract_timeline};

use super::{FetchContext, FetchOutcome, Fetcher, persist};

pub struct TwitterFetcher;

#[async_trait]
impl Fetcher for TwitterFetcher {
    fn network(&self) -> Network {
        Network::Twitter
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<FetchOutcome> {
        let since_id = ctx
            .store
            .latest(Network::Twitter)
            .await?
            .map(|s| s.origin_id)
            .filter(|id| *id > 0);

        let api = TwitterApi::new(
            ctx.credential.base_or(TwitterApi::DEFAULT_BASE),
            ctx.credential.oauth1(),
        )?;
        let tweets = api
            .user_timeline(since_id)
            .await
            .context("fetching user timeline")?;
        let received = tweets.len();

        let updates = extract_timeline(tweets, ctx.own_source_suffix, since_id);
        let stored = persist(ctx.store, &updates).await?;
        tracing::info!(received, stored, ?since_id, "sync.twitter.fetched");
        Ok(FetchOutcome {
            stored,
            crossposts: Vec::new(),
        })
    }
}
