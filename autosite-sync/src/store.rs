//! SQLite persistence for credentials and the status timeline.
//!
//! The schema ships as embedded migrations. All statements are runtime-checked
//! `sqlx::query` calls; timestamps are stored as unix seconds.
use std::str::FromStr;

use anyhow::{Context, Result};
use autosite_common::Network;
use autosite_config::NetworkSpec;
use autosite_social::StatusUpdate;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::credential::Credential;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

const CREDENTIAL_COLUMNS: &str = "network, consumer_key, consumer_secret, token, secret, \
     token_expiry, request_url, auth_url, access_url, repost, api_base";

const STATUS_COLUMNS: &str =
    "network, origin_id, heading, content, link, created_at, author, author_url";

fn from_unix(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).with_context(|| format!("timestamp out of range: {secs}"))
}

fn credential_from_row(r: &SqliteRow) -> Result<Credential> {
    Ok(Credential {
        network: r.try_get("network")?,
        consumer_key: r.try_get("consumer_key")?,
        consumer_secret: r.try_get("consumer_secret")?,
        token: r.try_get("token")?,
        secret: r.try_get("secret")?,
        token_expiry: r
            .try_get::<Option<i64>, _>("token_expiry")?
            .map(from_unix)
            .transpose()?,
        request_url: r.try_get("request_url")?,
        auth_url: r.try_get("auth_url")?,
        access_url: r.try_get("access_url")?,
        repost: r.try_get::<i64, _>("repost")? != 0,
        api_base: r.try_get("api_base")?,
    })
}

fn status_from_row(r: &SqliteRow) -> Result<StatusUpdate> {
    let network: String = r.try_get("network")?;
    Ok(StatusUpdate {
        network: Network::from_str(&network)?,
        origin_id: r.try_get("origin_id")?,
        heading: r.try_get("heading")?,
        content: r.try_get("content")?,
        link: r.try_get("link")?,
        created: from_unix(r.try_get("created_at")?)?,
        author: r.try_get("author")?,
        author_url: r.try_get("author_url")?,
    })
}

impl Store {
    /// Open (creating if needed) the database at `url` and apply migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url: {url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("opening database {url}"))?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database; a single connection keeps it alive and shared.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("applying migrations")?;
        Ok(Self { pool })
    }

    /// Insert or replace the credential for `c.network`.
    ///
    /// An empty `c.token` keeps the stored token, secret and expiry, so a config
    /// without tokens does not wipe what [`Store::update_token`] saved.
    pub async fn upsert_credential(&self, c: &Credential) -> Result<()> {
        let res = sqlx::query(
            r#"INSERT INTO credentials
               (network, consumer_key, consumer_secret, token, secret, token_expiry,
                request_url, auth_url, access_url, repost, api_base)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
               ON CONFLICT(network) DO UPDATE SET
                 consumer_key=excluded.consumer_key,
                 consumer_secret=excluded.consumer_secret,
                 token=CASE WHEN trim(excluded.token) = '' THEN credentials.token
                            ELSE excluded.token END,
                 secret=CASE WHEN trim(excluded.token) = '' THEN credentials.secret
                             ELSE excluded.secret END,
                 token_expiry=CASE WHEN trim(excluded.token) = '' THEN credentials.token_expiry
                                   ELSE excluded.token_expiry END,
                 request_url=excluded.request_url,
                 auth_url=excluded.auth_url,
                 access_url=excluded.access_url,
                 repost=excluded.repost,
                 api_base=excluded.api_base"#,
        )
        .bind(c.network.as_str())
        .bind(c.consumer_key.as_str())
        .bind(c.consumer_secret.as_str())
        .bind(c.token.as_str())
        .bind(c.secret.as_str())
        .bind(c.token_expiry.map(|t| t.timestamp()))
        .bind(c.request_url.as_str())
        .bind(c.auth_url.as_str())
        .bind(c.access_url.as_str())
        .bind(c.repost)
        .bind(c.api_base.as_deref())
        .execute(&self.pool)
        .await?;
        debug!(network = %c.network, rows = res.rows_affected(), "store.upsert_credential");
        Ok(())
    }

    /// Upsert one credential per configured network.
    pub async fn seed_credentials(&self, specs: &[NetworkSpec]) -> Result<usize> {
        for spec in specs {
            self.upsert_credential(&Credential::from(spec)).await?;
        }
        info!(count = specs.len(), "store.seed_credentials");
        Ok(specs.len())
    }

    /// All stored credentials in the order they were first added.
    pub async fn credentials(&self) -> Result<Vec<Credential>> {
        let rows = sqlx::query(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM credentials ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(credential_from_row).collect()
    }

    pub async fn credential(&self, network: &str) -> Result<Option<Credential>> {
        let row = sqlx::query(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE network = ?"
        ))
        .bind(network)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(credential_from_row).transpose()
    }

    /// Overwrite the access token of a stored credential. Returns `false` if absent.
    pub async fn update_token(
        &self,
        network: &str,
        token: &str,
        secret: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"UPDATE credentials SET token = ?1, secret = ?2, token_expiry = ?3
               WHERE network = ?4"#,
        )
        .bind(token)
        .bind(secret)
        .bind(expiry.map(|t| t.timestamp()))
        .bind(network)
        .execute(&self.pool)
        .await?;
        info!(network, rows = res.rows_affected(), "store.update_token");
        Ok(res.rows_affected() > 0)
    }

    /// The high-water mark: newest stored update for `network`, later inserts winning ties.
    pub async fn latest(&self, network: Network) -> Result<Option<StatusUpdate>> {
        let row = sqlx::query(&format!(
            "SELECT {STATUS_COLUMNS} FROM statuses WHERE network = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(network.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(status_from_row).transpose()
    }

    pub async fn insert_status(&self, u: &StatusUpdate) -> Result<i64> {
        let res = sqlx::query(
            r#"INSERT INTO statuses
               (network, origin_id, heading, content, link, created_at, author, author_url)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(u.network.as_str())
        .bind(u.origin_id)
        .bind(u.heading.as_str())
        .bind(u.content.as_deref())
        .bind(u.link.as_deref())
        .bind(u.created.timestamp())
        .bind(u.author.as_str())
        .bind(u.author_url.as_str())
        .execute(&self.pool)
        .await?;
        debug!(
            network = %u.network,
            origin_id = u.origin_id,
            "store.insert_status"
        );
        Ok(res.last_insert_rowid())
    }

    /// One page (1-based) of the timeline, newest first.
    pub async fn timeline(&self, page: u32, per_page: u32) -> Result<Vec<StatusUpdate>> {
        let per_page = i64::from(per_page.max(1));
        let offset = i64::from(page.max(1) - 1) * per_page;
        let rows = sqlx::query(&format!(
            "SELECT {STATUS_COLUMNS} FROM statuses \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(status_from_row).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM statuses")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Delete everything but the `keep` most recent updates, across all networks.
    pub async fn trim(&self, keep: u32) -> Result<u64> {
        let res = sqlx::query(
            r#"DELETE FROM statuses WHERE id IN (
                 SELECT id FROM statuses
                 ORDER BY created_at DESC, id DESC
                 LIMIT -1 OFFSET ?
               )"#,
        )
        .bind(i64::from(keep))
        .execute(&self.pool)
        .await?;
        info!(keep, removed = res.rows_affected(), "store.trim");
        Ok(res.rows_affected())
    }
}
