//! Timeline-Corpus main entry point
//!
//! This is the command-line interface for the Timeline-Corpus crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use timeline_corpus::config::{load_accounts, load_config_with_hash, Config};
use timeline_corpus::crawler::{build_corpus, Shutdown};
use timeline_corpus::output::print_summary;
use timeline_corpus::CorpusError;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when the config has no bearer token
const BEARER_TOKEN_ENV: &str = "TIMELINE_CORPUS_BEARER_TOKEN";

/// Timeline-Corpus: a bounded timeline crawler
///
/// Timeline-Corpus reads a list of account handles, finds where each
/// account's feed enters the configured time window, and writes every post
/// inside the window to one corpus file per account.
#[derive(Parser, Debug)]
#[command(name = "timeline-corpus")]
#[command(version = "1.0.0")]
#[command(about = "A bounded timeline crawler", long_about = None)]
struct Cli {
    /// Newline-delimited list of account handles
    #[arg(value_name = "ACCOUNTS")]
    accounts: PathBuf,

    /// Directory receiving one corpus file per account
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "corpus.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and accounts and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if config.api.bearer_token.is_none() {
        if let Ok(token) = std::env::var(BEARER_TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("Using bearer token from {}", BEARER_TOKEN_ENV);
                config.api.bearer_token = Some(token.trim().to_string());
            }
        }
    }

    let accounts = load_accounts(&cli.accounts)
        .with_context(|| format!("Failed to read accounts from {}", cli.accounts.display()))?;

    if cli.dry_run {
        handle_dry_run(&config, &accounts, &cli.output_dir);
        return Ok(());
    }

    handle_crawl(&config, &accounts, &cli.output_dir).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("timeline_corpus=info,warn"),
            1 => EnvFilter::new("timeline_corpus=debug,info"),
            2 => EnvFilter::new("timeline_corpus=trace,debug"),
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

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(config: &Config, accounts: &[String], output_dir: &Path) {
    println!("=== Timeline-Corpus Dry Run ===\n");

    println!("Time Window:");
    println!("  Lower: {}", config.window.lower.to_rfc3339());
    println!("  Upper: {}", config.window.upper.to_rfc3339());

    println!("\nCrawler Configuration:");
    println!("  Page size: {}", config.crawler.page_size);
    println!("  Courtesy delay: {}ms", config.crawler.courtesy_delay);
    println!(
        "  Network retry delay: {}ms",
        config.crawler.network_retry_delay
    );
    println!("  Rate limit slack: {}s", config.crawler.rate_limit_slack);
    println!(
        "  Max rate limit wait: {}s",
        config.crawler.max_rate_limit_wait
    );
    println!("  Max attempts: {}", config.crawler.max_retries);

    println!("\nAPI:");
    println!("  Base URL: {}", config.api.base_url);
    println!(
        "  Bearer token: {}",
        if config.api.bearer_token.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput directory: {}", output_dir.display());

    println!("\nAccounts ({}):", accounts.len());
    for account in accounts {
        println!("  - {}", account);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} accounts", accounts.len());
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, accounts: &[String], output_dir: &Path) -> anyhow::Result<()> {
    let shutdown = Shutdown::new();

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Shutdown requested, stopping after the current fetch");
            signal.trigger();
        }
    });

    let summary = build_corpus(config, accounts, output_dir, shutdown)
        .await
        .context("Corpus build failed")?;

    print_summary(&summary);

    if summary.was_interrupted() {
        return Err(CorpusError::Interrupted.into());
    }
    Ok(())
}
