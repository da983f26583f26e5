//! Link Harvester main entry point
//!
//! This is the command-line interface for the Link Harvester pipeline.

use anyhow::Context;
use clap::Parser;
use link_harvester::config::{collect_seeds, load_config_with_hash, Config};
use link_harvester::crawler::{build_http_client, download_assets, harvest};
use link_harvester::output::{print_download_summary, print_summary};
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Link Harvester: concurrent link extraction for a list of pages
///
/// Fetches every seed URL once, extracts link targets with a fixed attribute
/// pattern and appends `source<TAB>target` rows to a shared record file.
#[derive(Parser, Debug)]
#[command(name = "link-harvester")]
#[command(version)]
#[command(about = "Concurrent link harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "download")]
    dry_run: bool,

    /// Download every harvested asset into the configured download directory
    #[arg(long, conflicts_with = "dry_run")]
    download: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The log file location lives in the config, so load it before logging
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, Path::new(&config.output.log_path))?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    let seeds = collect_seeds(&config.input).context("failed to load seed list")?;
    tracing::info!("Total seed URLs: {}", seeds.len());

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
    } else if cli.download {
        handle_download(&config, &seeds).await?;
    } else {
        handle_harvest(&config, seeds).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber: stderr plus the persistent log file
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_harvester=info,warn"),
            1 => EnvFilter::new("link_harvester=debug,info"),
            2 => EnvFilter::new("link_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    ensure_parent_dir(log_path)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    let file_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Handles the --dry-run mode: shows settings and seeds
fn handle_dry_run(config: &Config, seeds: &BTreeSet<Url>) {
    println!("=== Link Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Link attribute: {}", config.crawler.link_attribute);
    match config.crawler.max_concurrent_tasks {
        Some(limit) => println!("  Max concurrent tasks: {}", limit),
        None => println!("  Max concurrent tasks: unbounded"),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  Log: {}", config.output.log_path);
    println!("  Downloads: {}", config.output.download_dir);

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, seeds: BTreeSet<Url>) -> anyhow::Result<()> {
    ensure_parent_dir(Path::new(&config.output.records_path))?;

    let summary = harvest(config, seeds)
        .await
        .context("harvest could not start")?;

    print_summary(&summary);
    Ok(())
}

/// Handles the --download mode
async fn handle_download(config: &Config, seeds: &BTreeSet<Url>) -> anyhow::Result<()> {
    let client = build_http_client(&config.crawler, &config.user_agent)?;
    let dir = Path::new(&config.output.download_dir);

    let summary = download_assets(&client, seeds, config.crawler.link_attribute, dir)
        .await
        .with_context(|| format!("download into {} could not start", dir.display()))?;

    print_download_summary(&summary);
    Ok(())
}
