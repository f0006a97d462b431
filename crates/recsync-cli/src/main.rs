//! recsync: uploads finished recordings and publishes the recordings index.
//!
//! Meant to be run periodically (e.g. from cron). Reads `config.json` next to the
//! executable unless `--config` or CONFIG_PATH says otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use recsync_cli::{init_tracing, summarize};
use recsync_core::{resolve_config_path, AppConfig, ConfigLoad};
use recsync_services::{RecordingSync, SyncOptions};
use recsync_storage::create_storage;

#[derive(Parser)]
#[command(name = "recsync", about = "Upload finished recordings and update the index")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List the recordings that would be uploaded without uploading anything
    #[arg(long)]
    dry_run: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config);

    let config = match AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?
    {
        ConfigLoad::Loaded(config) => config,
        ConfigLoad::TemplateCreated(path) => {
            println!("config.json created at {}", path.display());
            println!("Fill in your values and run this program again.");
            return Ok(());
        }
    };

    let storage = create_storage(&config)
        .await
        .context("Failed to create storage backend")?;
    tracing::debug!(backend = %storage.backend_type(), "Storage backend ready");

    let sync = RecordingSync::from_config(&config, storage);
    let report = sync
        .run(SyncOptions {
            dry_run: cli.dry_run,
        })
        .await
        .context("Sync failed")?;

    tracing::info!("{}", summarize(&report));
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "recsync failed");
            ExitCode::FAILURE
        }
    }
}
