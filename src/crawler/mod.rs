//! Crawler module for building timeline corpora
//!
//! This module contains the core crawling logic, including:
//! - Locating the page where the time window begins
//! - Crawling forward page by page until the window ends
//! - Classifying failures and retrying with the matching backoff
//! - Driving the account queue one account at a time

mod clock;
mod coordinator;
mod engine;
mod locator;
mod retry;

pub use clock::{Cancelled, InstantSleeper, Shutdown, Sleeper, TokioSleeper};
pub use coordinator::Coordinator;
pub use engine::{crawl_window, CrawlOutcome};
pub use locator::{locate_boundary, Boundary};
pub use retry::{crawl_account, Recovery, RetryPolicy};

use crate::config::Config;
use crate::feed::{FeedClient, FeedError, HttpFeedClient, PageRequest, Post};
use crate::output::{FileCorpusWriter, OutputError, RunSummary};
use crate::state::TimeWindow;
use crate::CorpusError;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a single attempt
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Shutdown requested")]
    Cancelled,
}

impl From<Cancelled> for CrawlError {
    fn from(_: Cancelled) -> Self {
        CrawlError::Cancelled
    }
}

/// Everything one attempt needs besides the output and the counter
pub struct CrawlContext<'a> {
    pub client: &'a dyn FeedClient,
    pub sleeper: &'a dyn Sleeper,
    pub shutdown: &'a Shutdown,
    pub window: TimeWindow,

    /// Posts per crawl page and probe stride
    pub page_size: u32,

    /// Pause after every crawl page fetch
    pub courtesy_delay: Duration,
}

impl<'a> CrawlContext<'a> {
    /// Fetches one page, unless shutdown was requested
    pub(crate) async fn fetch(&self, request: PageRequest<'_>) -> Result<Vec<Post>, CrawlError> {
        self.shutdown.check()?;
        Ok(self.client.fetch_page(&request).await?)
    }

    /// Samples the timestamp of the last post of base page `offset`
    ///
    /// Returns `None` if the feed ends before that position.
    pub(crate) async fn probe(
        &self,
        account: &str,
        offset: u64,
    ) -> Result<Option<DateTime<Utc>>, CrawlError> {
        let position = offset.saturating_mul(u64::from(self.page_size));
        let posts = self.fetch(PageRequest::probe(account, position)).await?;
        Ok(posts.first().map(|post| post.created_at))
    }

    /// Interruptible wait
    pub(crate) async fn pause(&self, duration: Duration) -> Result<(), CrawlError> {
        Ok(self.shutdown.sleep(self.sleeper, duration).await?)
    }
}

/// Runs a complete corpus build over HTTP
///
/// This is the main entry point. It will:
/// 1. Build the HTTP feed client
/// 2. Prepare the output directory
/// 3. Crawl every queued account in order
/// 4. Return the run summary
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use timeline_corpus::config::{load_accounts, load_config};
/// use timeline_corpus::crawler::{build_corpus, Shutdown};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("corpus.toml"))?;
/// let accounts = load_accounts(Path::new("accounts.txt"))?;
/// let summary = build_corpus(&config, &accounts, Path::new("corpus"), Shutdown::new()).await?;
/// println!("{} records written", summary.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn build_corpus(
    config: &Config,
    accounts: &[String],
    output_dir: &Path,
    shutdown: Shutdown,
) -> Result<RunSummary, CorpusError> {
    let client = HttpFeedClient::new(&config.api, &config.user_agent)?;
    let writer = FileCorpusWriter::new(output_dir)?;

    let mut coordinator = Coordinator::new(config, client, writer)?.with_shutdown(shutdown);
    Ok(coordinator.run(accounts).await)
}
