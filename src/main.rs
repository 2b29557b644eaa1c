//! Reel-Harvest main entry point
//!
//! This is the command-line interface for the Reel-Harvest media cataloger.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use reel_harvest::catalog::JsonStorage;
use reel_harvest::config::{load_config_with_hash, Config};
use reel_harvest::crawler::{run_crawl, CrawlMode, CrawlTarget};
use reel_harvest::output::{load_statistics, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reel-Harvest: an incremental open-directory media cataloger
///
/// Reel-Harvest walks directory listings on a remote server, finds playable
/// video files and keeps a deduplicated catalog of movies, series and
/// episodes across runs, one polite request at a time.
#[derive(Parser, Debug)]
#[command(name = "reel-harvest")]
#[command(version)]
#[command(about = "An incremental open-directory media cataloger", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Which categories to crawl
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the catalog files and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Movies,
    Series,
    Both,
}

impl From<Mode> for CrawlMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Movies => CrawlMode::Movies,
            Mode::Series => CrawlMode::Series,
            Mode::Both => CrawlMode::Both,
        }
    }
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
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let mode = CrawlMode::from(cli.mode);

    if cli.dry_run {
        handle_dry_run(&config, mode)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, mode).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_harvest=info,warn"),
            1 => EnvFilter::new("reel_harvest=debug,info"),
            2 => EnvFilter::new("reel_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, mode: CrawlMode) -> anyhow::Result<()> {
    println!("=== Reel-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!(
        "  Rate limit cooldown: {}ms",
        config.crawler.rate_limit_cooldown
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Flush every: {} new entries", config.crawler.flush_every);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Movies: {}", config.output.movies_path);
    println!("  Series: {}", config.output.series_path);
    println!("  Episodes: {}", config.output.episodes_path);

    if config.filter.min_size_gb.is_some() || config.filter.max_size_gb.is_some() {
        println!("\nSize Filter:");
        if let Some(min) = config.filter.min_size_gb {
            println!("  Min: {} GB", min);
        }
        if let Some(max) = config.filter.max_size_gb {
            println!("  Max: {} GB", max);
        }
    }

    println!("\nTargets ({}):", config.targets.len());
    let mut active = 0;
    for entry in &config.targets {
        let target = CrawlTarget::from_entry(entry)?;
        let marker = if mode.includes(target.category) {
            active += 1;
            "*"
        } else {
            " "
        };
        println!(
            "  {} [{}] {} -> {}",
            marker, target.category, target.label, target.root
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling {} target roots", active);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the catalog files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Movies: {}", config.output.movies_path);
    println!("Series: {}", config.output.series_path);
    println!("Episodes: {}\n", config.output.episodes_path);

    let storage = JsonStorage::from_config(&config.output);
    let stats = load_statistics(&storage).context("Failed to read the catalog")?;

    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, mode: CrawlMode) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl in {:?} mode over {} targets",
        mode,
        config.targets.len()
    );

    let stats = run_crawl(config, mode).await.context("Crawl failed")?;

    if stats.new_entries() == 0 {
        tracing::info!("Nothing new found");
    }

    Ok(())
}
