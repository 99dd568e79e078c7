//! Retry/backoff controller
//!
//! Runs whole attempts (locate, then crawl) for one account until one
//! succeeds, a failure rules out retrying, or the attempt budget is spent.

use crate::config::CrawlerConfig;
use crate::crawler::{crawl_window, locate_boundary, CrawlContext, CrawlError};
use crate::feed::FeedError;
use crate::output::{AccountReport, CorpusWriter, RecordStream};
use crate::state::{AccountState, SequenceCounter};
use std::time::Duration;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Wait, then start a new attempt if the budget allows
    RetryAfter(Duration),
    /// Give up on this account
    Abort,
    /// Give up on the whole run
    Stop,
}

/// Attempt budget and backoff intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub network_delay: Duration,
    pub rate_limit_slack: Duration,

    /// Advertised cool-downs are capped at this before the slack is added
    pub max_rate_limit_wait: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            network_delay: config.network_retry_delay(),
            rate_limit_slack: config.rate_limit_slack(),
            max_rate_limit_wait: config.max_rate_limit_wait(),
        }
    }

    /// Maps a failure to its recovery
    pub fn recovery_for(&self, error: &CrawlError) -> Recovery {
        match error {
            CrawlError::Feed(FeedError::Network(_)) => Recovery::RetryAfter(self.network_delay),
            CrawlError::Feed(FeedError::RateLimited { retry_after }) => Recovery::RetryAfter(
                (*retry_after)
                    .min(self.max_rate_limit_wait)
                    .saturating_add(self.rate_limit_slack),
            ),
            CrawlError::Feed(FeedError::AccessDenied { .. }) => Recovery::Abort,
            CrawlError::Output(_) => Recovery::Abort,
            CrawlError::Cancelled => Recovery::Stop,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Crawls one account to a terminal state
///
/// Every attempt writes to a freshly opened output. A failed attempt's
/// output is discarded and the ids it took are returned to `counter`, so ids
/// in kept files stay gapless.
pub async fn crawl_account<W: CorpusWriter>(
    ctx: &CrawlContext<'_>,
    policy: &RetryPolicy,
    writer: &W,
    counter: &mut SequenceCounter,
    account: &str,
) -> AccountReport {
    let mut attempts = 0u32;
    let mut last_failure = None;

    let (state, records) = loop {
        attempts += 1;
        tracing::info!("Try ({}/{}): {}", attempts, policy.max_attempts, account);

        let checkpoint = counter.checkpoint();
        let error = match attempt(ctx, writer, counter, account).await {
            Ok(records) => break (AccountState::Succeeded, records),
            Err(error) => error,
        };
        counter.rollback(checkpoint);
        last_failure = Some(error.to_string());

        match policy.recovery_for(&error) {
            Recovery::Stop => break (AccountState::Interrupted, 0),
            Recovery::Abort => {
                tracing::warn!("Giving up on {}: {}", account, error);
                break (AccountState::Exhausted, 0);
            }
            Recovery::RetryAfter(_) if attempts >= policy.max_attempts => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    account,
                    attempts,
                    error
                );
                break (AccountState::Exhausted, 0);
            }
            Recovery::RetryAfter(delay) => {
                tracing::warn!(
                    "Attempt {} for {} failed: {}; retrying in {:.1}s",
                    attempts,
                    account,
                    error,
                    delay.as_secs_f64()
                );
                if ctx.pause(delay).await.is_err() {
                    break (AccountState::Interrupted, 0);
                }
            }
        }
    };

    AccountReport {
        account: account.to_string(),
        state,
        attempts,
        records,
        last_failure: if state.is_success() { None } else { last_failure },
    }
}

/// One locate-then-crawl cycle into a fresh output
async fn attempt<W: CorpusWriter>(
    ctx: &CrawlContext<'_>,
    writer: &W,
    counter: &mut SequenceCounter,
    account: &str,
) -> Result<u64, CrawlError> {
    let mut stream = writer.open(account)?;

    let crawled = match locate_boundary(ctx, account).await {
        Ok(boundary) => crawl_window(ctx, account, boundary.page, counter, &mut stream).await,
        Err(e) => Err(e),
    };

    match crawled {
        Ok(outcome) => {
            tracing::debug!(
                "Crawled {} pages of {}, {} records, {} newer posts skipped",
                outcome.pages,
                account,
                outcome.emitted,
                outcome.skipped_newer
            );
            Ok(stream.close()?)
        }
        Err(e) => {
            if let Err(abandon_err) = stream.abandon() {
                tracing::warn!("Failed to discard output for {}: {}", account, abandon_err);
            }
            Err(e)
        }
    }
}
