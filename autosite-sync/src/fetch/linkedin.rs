use anyhow::{Context, Result};
use async_trait::async_trait;
use autosite_common::Network;
use autosite_social::linkedin::{LinkedinApi, extract_updates};

use super::{FetchContext, FetchOutcome, Fetcher, persist};

pub struct LinkedinFetcher;

#[async_trait]
impl Fetcher for LinkedinFetcher {
    fn network(&self) -> Network {
        Network::Linkedin
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<FetchOutcome> {
        let after = ctx
            .store
            .latest(Network::Linkedin)
            .await?
            .map(|s| s.origin_id + 1);

        let api = LinkedinApi::new(
            ctx.credential.base_or(LinkedinApi::DEFAULT_BASE),
            ctx.credential.token.clone(),
        )?;
        let feed = api.own_shares(after).await.context("fetching shares")?;

        let harvest = extract_updates(feed, ctx.credential.repost);
        let stored = persist(ctx.store, &harvest.updates).await?;
        tracing::info!(stored, ?after, "sync.linkedin.fetched");
        Ok(FetchOutcome {
            stored,
            crossposts: harvest.crossposts,
        })
    }
}
