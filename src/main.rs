//! Saqme main entry point
//!
//! This is the command-line interface for the Saqme job board harvester.

use clap::{Parser, Subcommand};
use saqme::config::{load_config_with_hash, CatalogEntry, Config};
use saqme::crawler::{CrawlRequest, Crawler, StopReason, Sweeper};
use saqme::schedule::start_scheduler;
use saqme::storage::{open_storage, FilterKind, FilterOption, JobStore, SqliteStorage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Saqme: a polite job board harvester
///
/// Saqme crawls a paginated job listing board, extracts structured job
/// records, and keeps a deduplicated SQLite mirror fresh through
/// scheduled sweeps and purges.
#[derive(Parser, Debug)]
#[command(name = "saqme")]
#[command(version = "1.0.0")]
#[command(about = "A polite job board harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one bounded query and print the listings it finds
    Crawl {
        /// Free-text search term
        #[arg(long, default_value = "")]
        query: String,

        /// Job type wire value ("0" = no filter)
        #[arg(long, default_value = "0")]
        job_type: String,

        /// Location wire value ("0" = no filter)
        #[arg(long, default_value = "0")]
        location: String,

        /// Category wire value ("0" = no filter)
        #[arg(long, default_value = "0")]
        category: String,

        /// First page to fetch
        #[arg(long, default_value_t = 1)]
        start_page: u32,

        /// Maximum pages to fetch (defaults to the configured value)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Crawl every filter combination and persist the deduplicated result
    Sweep,

    /// Delete expired jobs from storage
    Purge {
        /// Delete every job instead of only expired ones
        #[arg(long)]
        all: bool,
    },

    /// Seed the filter catalogs from the configuration file
    Seed,

    /// Show stored job and catalog counts
    Stats,

    /// Run the cron scheduler until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl {
            query,
            job_type,
            location,
            category,
            start_page,
            max_pages,
        } => {
            let request = CrawlRequest {
                query,
                job_type,
                location,
                category,
                start_page,
                max_pages: max_pages.unwrap_or(config.crawl.max_pages),
                page_delay: Duration::from_millis(config.crawl.page_delay_ms),
            };
            handle_crawl(&config, request).await?;
        }
        Command::Sweep => handle_sweep(&config).await?,
        Command::Purge { all } => handle_purge(&config, all)?,
        Command::Seed => handle_seed(&config)?,
        Command::Stats => handle_stats(&config)?,
        Command::Schedule => handle_schedule(&config).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("saqme=info,warn"),
            1 => EnvFilter::new("saqme=debug,info"),
            2 => EnvFilter::new("saqme=trace,debug"),
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

/// Opens the configured database
fn open_configured_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    Ok(storage)
}

/// Builds the sweeper over shared storage
fn build_sweeper(config: &Config) -> anyhow::Result<Sweeper> {
    let storage = Arc::new(Mutex::new(open_configured_storage(config)?));
    let crawler = Crawler::new(config)?;
    Ok(Sweeper::new(
        crawler,
        storage,
        Duration::from_millis(config.sweep.combination_delay_ms),
    ))
}

/// Handles the crawl subcommand: one bounded query, printed to stdout
async fn handle_crawl(config: &Config, request: CrawlRequest) -> anyhow::Result<()> {
    let crawler = Crawler::new(config)?;
    let result = crawler.crawl(&request).await?;

    println!("=== Crawl Results ===\n");
    println!("Pages fetched: {}", result.pages_fetched);
    println!(
        "Stopped because: {}",
        match result.stop {
            StopReason::Exhausted => "no further pages",
            StopReason::PageCapReached => "page cap reached",
        }
    );
    println!("Listings found: {}\n", result.total_found());

    for listing in &result.listings {
        let id = listing
            .external_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "?".to_string());
        if listing.company.is_empty() {
            println!("  [{}] {}", id, listing.title);
        } else {
            println!("  [{}] {} - {}", id, listing.title, listing.company);
        }
    }

    Ok(())
}

/// Handles the sweep subcommand: full cartesian sweep into storage
async fn handle_sweep(config: &Config) -> anyhow::Result<()> {
    let sweeper = build_sweeper(config)?;
    let summary = sweeper.run_full_sweep().await?;

    println!("=== Sweep Summary ===\n");
    println!("Combinations crawled: {}", summary.combinations);
    println!("Combinations failed:  {}", summary.failed_combinations);
    println!("Unique jobs found:    {}", summary.unique_jobs);
    println!("Records saved:        {}", summary.saved);

    Ok(())
}

/// Handles the purge subcommand
fn handle_purge(config: &Config, all: bool) -> anyhow::Result<()> {
    let mut storage = open_configured_storage(config)?;

    let deleted = if all {
        storage.delete_all_jobs()?
    } else {
        storage.delete_jobs_with_deadline_before(chrono::Utc::now())?
    };

    if all {
        println!("✓ Deleted all {} stored jobs", deleted);
    } else {
        println!("✓ Deleted {} expired jobs", deleted);
    }

    Ok(())
}

/// Handles the seed subcommand: loads filter catalogs into storage
fn handle_seed(config: &Config) -> anyhow::Result<()> {
    let mut storage = open_configured_storage(config)?;

    println!("=== Seeding Filter Catalogs ===\n");

    let catalogs: [(&str, FilterKind, &[CatalogEntry]); 3] = [
        ("Job types", FilterKind::JobType, &config.types),
        ("Locations", FilterKind::Location, &config.locations),
        ("Categories", FilterKind::Category, &config.categories),
    ];

    for (label, kind, entries) in catalogs {
        let options = to_filter_options(entries);
        let inserted = storage.seed_filter_options(kind, &options)?;
        println!("{}: {} entries, {} newly inserted", label, options.len(), inserted);
    }

    println!("\n✓ Catalogs seeded");
    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_configured_storage(config)?;

    println!("Database: {}\n", config.storage.database_path);
    println!("Stored jobs: {}", storage.count_jobs()?);

    println!("\nFilter catalogs:");
    println!(
        "  Job types:  {}",
        storage.list_filter_options(FilterKind::JobType)?.len()
    );
    println!(
        "  Locations:  {}",
        storage.list_filter_options(FilterKind::Location)?.len()
    );
    println!(
        "  Categories: {}",
        storage.list_filter_options(FilterKind::Category)?.len()
    );

    Ok(())
}

/// Handles the schedule subcommand: runs the cron scheduler until Ctrl-C
async fn handle_schedule(config: &Config) -> anyhow::Result<()> {
    let sweeper = Arc::new(build_sweeper(config)?);
    let _scheduler = start_scheduler(&config.schedule, sweeper).await?;

    println!("Scheduler running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down scheduler");
    Ok(())
}

/// Converts config catalog entries to storage filter options
fn to_filter_options(entries: &[CatalogEntry]) -> Vec<FilterOption> {
    entries
        .iter()
        .map(|entry| FilterOption {
            id: entry.id,
            name: entry.name.clone(),
            value: entry.value,
        })
        .collect()
}
