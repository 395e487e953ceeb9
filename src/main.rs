//! Docket main entry point
//!
//! This is the command-line interface for the Docket document harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docket::config::{load_config_with_hash, Config};
use docket::crawler::{CrawlOrchestrator, Schedule, Scheduler};
use docket::output::{
    format_cycle_summary, format_document, format_search_results, load_statistics,
    print_statistics,
};
use docket::storage::{DocumentStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Number of past cycles listed by `stats`
const RECENT_CYCLES: u32 = 5;

/// Docket: a government document harvester
///
/// Docket crawls document listing pages, extracts the documents they link to,
/// and keeps them in a searchable local store.
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(version = "1.0.0")]
#[command(about = "A government document harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
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
    /// Validate config and show what would be crawled without crawling
    Check,

    /// Run one crawl cycle now and print its summary
    Crawl,

    /// Run crawl cycles on the configured schedule until interrupted
    Run,

    /// Search stored documents
    Search {
        /// Words to look for; +word required, -word excluded, word* prefix
        #[arg(value_name = "QUERY", num_args = 1.., required = true)]
        query: Vec<String>,
    },

    /// Show one stored document
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Show document store statistics and recent cycles
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Crawl => handle_crawl(&config, config_hash).await,
        Command::Run => handle_run(&config, config_hash).await,
        Command::Search { query } => handle_search(&config, &query.join(" ")).await,
        Command::Show { id } => handle_show(&config, id).await,
        Command::Stats => handle_stats(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docket=info,warn"),
            1 => EnvFilter::new("docket=debug,info"),
            2 => EnvFilter::new("docket=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.database, config.search.max_results)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;
    Ok(Arc::new(store))
}

/// Validates config and shows what would be crawled
fn handle_check(config: &Config) -> anyhow::Result<()> {
    let schedule = Schedule::parse(&config.schedule.expression)?;

    println!("=== Docket Configuration Check ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent sources: {}",
        config.crawler.max_concurrent_sources
    );
    println!(
        "  Max concurrent resolves: {}",
        config.crawler.max_concurrent_resolves
    );
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );
    println!(
        "  Max content length: {} chars",
        config.crawler.max_content_length
    );
    println!("  Max body size: {} bytes", config.crawler.max_body_bytes);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nDatabase:");
    println!("  Path: {}", config.database.path);
    println!(
        "  Pool: {} connections, {}ms acquire timeout",
        config.database.pool_size, config.database.acquire_timeout_ms
    );

    let next = schedule
        .next_after(&chrono::Local::now())
        .map(|t| t.format("%Y-%m-%d %H:%M %Z").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!("\nSchedule: {} (next run {})", schedule, next);

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!(
            "  - {} [{}] category={}",
            source.url,
            source.family.as_str(),
            source.category
        );
        if !source.tags.is_empty() {
            println!("    tags: {}", source.tags.join(", "));
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} sources", config.sources.len());

    Ok(())
}

/// Runs one crawl cycle now
async fn handle_crawl(config: &Config, config_hash: String) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let orchestrator = CrawlOrchestrator::from_config(config, config_hash, store.clone())?;

    // Ctrl-C stops the cycle before its next source
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing sources in flight");
            interrupt.cancel();
        }
    });

    let summary = orchestrator.run(&cancel).await;
    print!("{}", format_cycle_summary(&summary));

    store.close();
    Ok(())
}

/// Runs the scheduler until Ctrl-C
async fn handle_run(config: &Config, config_hash: String) -> anyhow::Result<()> {
    let schedule = Schedule::parse(&config.schedule.expression)?;
    let store = open_store(config).await?;
    let orchestrator = CrawlOrchestrator::from_config(config, config_hash, store.clone())?;

    let scheduler =
        Scheduler::new(schedule, Arc::new(orchestrator)).run_on_start(config.schedule.run_on_start);
    scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Interrupt received, stopping scheduler");

    scheduler.stop().await;
    store.close();
    Ok(())
}

async fn handle_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let hits = store.search(query).await?;

    print!("{}", format_search_results(query, &hits));

    store.close();
    Ok(())
}

async fn handle_show(config: &Config, id: i64) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let document = store.load(id).await?;

    print!("{}", format_document(&document));

    store.close();
    Ok(())
}

async fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.database.path);

    let store = open_store(config).await?;
    let report = load_statistics(store.as_ref(), RECENT_CYCLES).await?;

    print_statistics(&report);

    store.close();
    Ok(())
}
