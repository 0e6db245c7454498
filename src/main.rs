//! Jarhound main entry point
//!
//! Command-line interface for the incremental catalog scraper.

use clap::Parser;
use jarhound::config::{load_config, Config};
use jarhound::scraper::{scrape, ScrapeOptions};
use jarhound::storage::{open_storage, CatalogStore, LogStatus};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Jarhound: an incremental catalog scraper
///
/// Scrapes a paginated mobile-games catalog into SQLite, optionally
/// downloading the game artifacts. Progress is logged durably, so an
/// interrupted run resumes from the last fully-processed page.
#[derive(Parser, Debug)]
#[command(name = "jarhound")]
#[command(version = "1.0.0")]
#[command(about = "An incremental, resumable catalog scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Download artifacts while scraping
    #[arg(long)]
    download: bool,

    /// Starting page number (default: resume from the crawl log)
    #[arg(long, value_name = "PAGE", value_parser = clap::value_parser!(u32).range(1..))]
    start_page: Option<u32>,

    /// Ending page number, inclusive (default: the configured catalog bound)
    #[arg(long, value_name = "PAGE", value_parser = clap::value_parser!(u32).range(1..))]
    end_page: Option<u32>,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["download", "start_page", "end_page"])]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if cli.stats {
        handle_stats(&config)?;
    } else {
        let options = ScrapeOptions {
            download: cli.download,
            start_page: cli.start_page,
            end_page: cli.end_page,
        };
        scrape(config, options).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jarhound=info,warn"),
            1 => EnvFilter::new("jarhound=debug,info"),
            2 => EnvFilter::new("jarhound=trace,debug"),
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

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;

    println!("Database: {}", config.output.database_path);
    println!(
        "Snapshot: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!("Items stored:    {}", storage.count_items()?);
    println!(
        "Pages succeeded: {}",
        storage.count_log_entries(LogStatus::Success)?
    );
    println!(
        "Pages errored:   {}",
        storage.count_log_entries(LogStatus::Error)?
    );
    println!(
        "Resume point:    page {}",
        storage.last_successful_page()? + 1
    );

    Ok(())
}
