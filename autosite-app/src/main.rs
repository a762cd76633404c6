use std::path::PathBuf;

use anyhow::{Context, Result};
use autosite_common::observability::{LogConfig, LogFormat, init_logging};
use autosite_config::{AutositeConfig, AutositeConfigLoader};
use autosite_sync::{RefreshSettings, Store};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "autosite", version, about = "Social feed aggregator for a personal site")]
struct Cli {
    /// Configuration file; a missing default file is tolerated
    #[arg(short, long, env = "AUTOSITE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll every configured network, cross-post and trim the timeline
    Refresh,
    /// List stored status updates, newest first
    Timeline {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 9)]
        per_page: u32,
    },
    /// List stored credentials and whether they can be used now
    Networks,
}

fn log_config(cfg: &AutositeConfig) -> Result<LogConfig> {
    let mut log = LogConfig {
        emit_stderr: cfg.log.stderr,
        log_dir: cfg.log.dir.as_ref().map(PathBuf::from),
        ..LogConfig::default()
    };
    if let Some(format) = cfg.log.format.as_deref() {
        log.format = format.parse::<LogFormat>()?;
    }
    if let Some(filter) = cfg.log.filter.as_deref() {
        log.default_filter = filter.to_string();
    }
    Ok(log)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Env wins over the file.
    let loader = match &cli.config {
        Some(path) => AutositeConfigLoader::new().with_file(path),
        None => AutositeConfigLoader::new().with_optional_file("autosite.yaml"),
    };
    let cfg = loader.load().context("loading configuration")?;

    let log_path = init_logging(log_config(&cfg)?)?;
    tracing::info!(log = %log_path.display(), command = ?cli.command, "app.start");

    let store = Store::connect(&cfg.database_url).await?;
    store.seed_credentials(&cfg.networks).await?;

    match cli.command {
        Command::Refresh => {
            let report = autosite_sync::refresh(&store, &RefreshSettings::from(&cfg)).await?;
            println!("{report}");
        }
        Command::Timeline { page, per_page } => {
            print!("{}", commands::timeline(&store, page, per_page).await?);
        }
        Command::Networks => {
            print!("{}", commands::networks(&store, chrono::Utc::now()).await?);
        }
    }
    Ok(())
}
