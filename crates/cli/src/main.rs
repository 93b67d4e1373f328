//! sheetscope command-line entry point.
//!
//! Fetches one retrieval tier of a spreadsheet and prints it as JSON on
//! stdout. Logging goes to stderr so the output stays machine-readable.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetscope_client::{RetrievalOptions, SheetsClient, Tier, TierRequest, TieredRetrieval};
use sheetscope_core::{AppConfig, CacheBackend, CacheDb, MemoryCache, TierCache};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierArg {
    Metadata,
    Structure,
    Sample,
    Full,
    Snapshot,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Metadata => Tier::Metadata,
            TierArg::Structure => Tier::Structure,
            TierArg::Sample => Tier::Sample,
            TierArg::Full => Tier::Full,
            TierArg::Snapshot => Tier::Snapshot,
        }
    }
}

#[derive(Parser)]
#[command(name = "sheetscope", about = "Tiered, cached spreadsheet retrieval.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one tier of a spreadsheet and print it as JSON.
    Get {
        /// Tier to retrieve.
        #[arg(value_enum)]
        tier: TierArg,

        /// Spreadsheet id.
        spreadsheet_id: String,

        /// Target sheet for the sample, full and snapshot tiers (default: first sheet).
        #[arg(long)]
        sheet_id: Option<i64>,

        /// Rows to sample (sample tier only).
        #[arg(long)]
        sample_size: Option<u32>,

        /// Row cap (snapshot tier only).
        #[arg(long)]
        max_rows: Option<u32>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Remove expired entries from the SQLite cache.
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    match args.command {
        Command::Get { tier, spreadsheet_id, sheet_id, sample_size, max_rows, pretty } => {
            let request = TierRequest { tier: tier.into(), sheet_id, sample_size, max_rows };
            get(&config, &spreadsheet_id, request, pretty).await
        }
        Command::Purge => purge(&config).await,
    }
}

async fn get(config: &AppConfig, spreadsheet_id: &str, request: TierRequest, pretty: bool) -> Result<()> {
    let cache: Arc<dyn TierCache> = match config.cache_backend {
        CacheBackend::Sqlite => Arc::new(
            CacheDb::open(&config.db_path)
                .await
                .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?,
        ),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
    };
    let client = SheetsClient::from_app_config(config).context("failed to build document API client")?;
    let retrieval = TieredRetrieval::new(Arc::new(client), cache).with_options(RetrievalOptions::from(config));

    tracing::info!("retrieving tier {} of {}", request.tier, spreadsheet_id);
    let data = retrieval.get_tier(spreadsheet_id, request).await?;

    let json = if pretty { serde_json::to_string_pretty(&data)? } else { serde_json::to_string(&data)? };
    println!("{json}");
    Ok(())
}

async fn purge(config: &AppConfig) -> Result<()> {
    if config.cache_backend != CacheBackend::Sqlite {
        tracing::info!("memory cache configured, nothing to purge");
        return Ok(());
    }
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;
    let removed = db.purge_expired().await?;
    tracing::info!("purged {} expired cache entries", removed);
    println!("{removed}");
    Ok(())
}
