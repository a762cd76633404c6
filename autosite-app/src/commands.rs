use std::fmt::Write;

use anyhow::Result;
use autosite_sync::Store;
use chrono::{DateTime, Utc};

pub async fn timeline(store: &Store, page: u32, per_page: u32) -> Result<String> {
    let mut out = String::new();
    let updates = store.timeline(page, per_page).await?;
    if updates.is_empty() {
        writeln!(out, "no status updates on page {page}")?;
    }
    for u in updates {
        writeln!(
            out,
            "{}  {:<8}  {}: {}",
            u.created.format("%Y-%m-%d %H:%M"),
            u.network_title(),
            u.author,
            u.heading
        )?;
        if let Some(content) = u.content.as_deref() {
            writeln!(out, "    {content}")?;
        }
        if let Some(link) = u.link.as_deref() {
            writeln!(out, "    {link}")?;
        }
    }
    Ok(out)
}

pub async fn networks(store: &Store, now: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();
    for c in store.credentials().await? {
        let state = match c.check_usable(now) {
            Ok(()) => "usable".to_string(),
            Err(e) => e.to_string(),
        };
        writeln!(
            out,
            "{:<10} {:<6} repost={:<5} {}",
            c.network,
            if c.is_oauth1() { "oauth1" } else { "oauth2" },
            c.repost,
            state
        )?;
    }
    Ok(out)
}
