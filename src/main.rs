//! Gig-Harvest main entry point
//!
//! This is the command-line interface for the Gig-Harvest listing aggregator.

use chrono::Utc;
use clap::Parser;
use gig_harvest::config::{load_config, Config};
use gig_harvest::ingest::Pipeline;
use gig_harvest::output::{load_source_summary, print_listings, print_source_summary};
use gig_harvest::storage::{open_storage, SqliteStorage, Storage, ViewedFilter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Gig-Harvest: collects freelance projects and job offers from several sites
///
/// Without a mode flag, runs one ingestion against every configured source
/// and stores the listings not seen before.
#[derive(Parser, Debug)]
#[command(name = "gig-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A multi-source listing aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in sources when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the sources without fetching anything
    #[arg(long, conflicts_with_all = ["list", "archive", "mark_viewed", "summary"])]
    dry_run: bool,

    /// Show listings that have not been reviewed yet
    #[arg(long, conflicts_with_all = ["archive", "mark_viewed", "summary"])]
    list: bool,

    /// Show reviewed listings
    #[arg(long, conflicts_with_all = ["mark_viewed", "summary"])]
    archive: bool,

    /// Mark the listing with this ID as reviewed
    #[arg(long, value_name = "ID", conflicts_with = "summary")]
    mark_viewed: Option<i64>,

    /// Show unreviewed listing counts per source
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using built-in sources");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let mut storage = open_storage(Path::new(&config.output.database_path))?;

    if cli.list {
        print_listings(&storage.list_listings(ViewedFilter::Unviewed)?);
    } else if cli.archive {
        print_listings(&storage.list_listings(ViewedFilter::Viewed)?);
    } else if let Some(id) = cli.mark_viewed {
        storage.mark_viewed(id, Utc::now())?;
        println!("Listing {} marked as viewed", id);
    } else if cli.summary {
        let summary = load_source_summary(&config, &storage)?;
        print_source_summary(&summary, storage.count_listings()?);
    } else {
        handle_ingest(&config, storage).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gig_harvest=info,warn"),
            1 => EnvFilter::new("gig_harvest=debug,info"),
            2 => EnvFilter::new("gig_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what a run would query
fn handle_dry_run(config: &Config) {
    println!("=== Gig-Harvest Dry Run ===\n");

    println!("Fetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!(
            "  - {} [{} {}] {} {}",
            source.name, source.parser, source.kind, source.site, source.color
        );
        println!("    * {}", source.url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the default mode: one ingestion run
async fn handle_ingest(
    config: &Config,
    storage: SqliteStorage,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting ingestion over {} sources", config.sources.len());

    let mut pipeline = Pipeline::from_config(config, storage)?;
    let created = pipeline.run_ingestion().await;

    println!("{} new listings", created.len());
    Ok(())
}
