//! Crawler coordinator - main corpus run orchestration
//!
//! This module contains the account loop that ties everything together:
//! - Holding the run-wide sequence counter
//! - Driving the retry controller for each queued account in order
//! - Stopping cleanly when shutdown is requested
//! - Collecting the run summary

use crate::config::Config;
use crate::crawler::{crawl_account, CrawlContext, RetryPolicy, Shutdown, Sleeper, TokioSleeper};
use crate::feed::FeedClient;
use crate::output::{CorpusWriter, RunSummary};
use crate::state::{AccountState, SequenceCounter, TimeWindow};
use crate::CorpusError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main corpus coordinator structure
pub struct Coordinator<C, W> {
    client: C,
    writer: W,
    window: TimeWindow,
    page_size: u32,
    courtesy_delay: Duration,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    shutdown: Shutdown,
    counter: SequenceCounter,
}

impl<C: FeedClient, W: CorpusWriter> Coordinator<C, W> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The corpus configuration
    /// * `client` - The timeline provider
    /// * `writer` - Where per-account corpus files go
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CorpusError)` - The configured window is invalid
    pub fn new(config: &Config, client: C, writer: W) -> Result<Self, CorpusError> {
        let window = config.window.to_window()?;

        Ok(Self {
            client,
            writer,
            window,
            page_size: config.crawler.page_size,
            courtesy_delay: config.crawler.courtesy_delay(),
            policy: RetryPolicy::from_config(&config.crawler),
            sleeper: Arc::new(TokioSleeper),
            shutdown: Shutdown::new(),
            counter: SequenceCounter::new(),
        })
    }

    /// Replaces the tokio timer, e.g. with an
    /// [`InstantSleeper`](crate::crawler::InstantSleeper)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// A handle that stops the run when triggered
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn counter(&self) -> &SequenceCounter {
        &self.counter
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Runs every account in `accounts` to a terminal state, in order
    ///
    /// A failed account never stops the run; only a shutdown request does.
    /// Accounts after an interrupted one are counted as skipped.
    pub async fn run(&mut self, accounts: &[String]) -> RunSummary {
        tracing::info!(
            "Starting corpus run: {} accounts, window {}",
            accounts.len(),
            self.window
        );

        let start_time = Instant::now();
        let mut summary = RunSummary::new();

        let ctx = CrawlContext {
            client: &self.client,
            sleeper: self.sleeper.as_ref(),
            shutdown: &self.shutdown,
            window: self.window,
            page_size: self.page_size,
            courtesy_delay: self.courtesy_delay,
        };

        for (index, account) in accounts.iter().enumerate() {
            if self.shutdown.is_triggered() {
                summary.skipped = accounts.len() - index;
                break;
            }

            tracing::info!("Crawling {} ({}/{})", account, index + 1, accounts.len());
            let report =
                crawl_account(&ctx, &self.policy, &self.writer, &mut self.counter, account).await;

            match report.state {
                AccountState::Succeeded => tracing::info!(
                    "Finished {}: {} records in {} attempt(s)",
                    account,
                    report.records,
                    report.attempts
                ),
                AccountState::Exhausted => tracing::warn!(
                    "Failed {} after {} attempt(s): {}",
                    account,
                    report.attempts,
                    report.last_failure.as_deref().unwrap_or("unknown error")
                ),
                AccountState::Interrupted => {
                    tracing::warn!("Interrupted while crawling {}", account)
                }
                AccountState::Attempting => {}
            }

            let interrupted = report.state == AccountState::Interrupted;
            summary.record(report);
            if interrupted {
                summary.skipped = accounts.len() - index - 1;
                break;
            }
        }

        summary.elapsed = start_time.elapsed();
        tracing::info!(
            "Corpus build complete: {} succeeded, {} failed, {} records in {:.1}s",
            summary.succeeded(),
            summary.failed(),
            summary.total_records(),
            summary.elapsed.as_secs_f64()
        );

        summary
    }
}
