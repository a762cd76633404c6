use anyhow::{Context, Result};
use async_trait::async_trait;
use autosite_common::Network;
use autosite_social::xing::{XingApi, extract_feed};

use super::{FetchContext, FetchOutcome, Fetcher, persist};

pub struct XingFetcher;

#[async_trait]
impl Fetcher for XingFetcher {
    fn network(&self) -> Network {
        Network::Xing
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<FetchOutcome> {
        let since = ctx.store.latest(Network::Xing).await?.map(|s| s.created);

        let api = XingApi::new(
            ctx.credential.base_or(XingApi::DEFAULT_BASE),
            ctx.credential.token.clone(),
        )?;
        let feed = api.feed(since).await.context("fetching network feed")?;

        let harvest = extract_feed(feed, since, ctx.credential.repost);
        let stored = persist(ctx.store, &harvest.updates).await?;
        tracing::info!(stored, ?since, "sync.xing.fetched");
        Ok(FetchOutcome {
            stored,
            crossposts: harvest.crossposts,
        })
    }
}
