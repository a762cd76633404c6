use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use autosite_common::Network;
use autosite_http::HttpError;
use autosite_social::github::{GithubApi, extract_events};

use super::{FetchContext, FetchOutcome, Fetcher, persist};

pub struct GithubFetcher;

#[async_trait]
impl Fetcher for GithubFetcher {
    fn network(&self) -> Network {
        Network::Github
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<FetchOutcome> {
        let latest = ctx.store.latest(Network::Github).await?;
        let since = latest.as_ref().map(|s| s.created);
        let api = GithubApi::new(
            ctx.credential.base_or(GithubApi::DEFAULT_BASE),
            ctx.credential.token.clone(),
        )?;

        let login = match api.authenticated_user(since).await {
            Ok(user) => user.login,
            Err(err) => {
                let fallback = latest
                    .as_ref()
                    .map(|s| s.author.clone())
                    .filter(|a| !a.is_empty());
                match fallback {
                    Some(login) => {
                        tracing::debug!(error = %err, %login, "sync.github.login_fallback");
                        login
                    }
                    None => {
                        return Err(anyhow!(err).context("resolving the authenticated login"));
                    }
                }
            }
        };

        let events = match api.user_events(&login, since).await {
            Ok(events) => events,
            Err(HttpError::NotModified) => {
                tracing::info!(%login, "sync.github.not_modified");
                return Ok(FetchOutcome::default());
            }
            Err(err) => return Err(err).context("fetching events"),
        };
        let received = events.len();

        let harvest = extract_events(events, &login, since, ctx.credential.repost);
        let stored = persist(ctx.store, &harvest.updates).await?;
        tracing::info!(
            %login,
            received,
            stored,
            candidates = harvest.crossposts.len(),
            "sync.github.fetched"
        );
        Ok(FetchOutcome {
            stored,
            crossposts: harvest.crossposts,
        })
    }
}
