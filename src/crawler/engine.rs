//! Crawl engine
//!
//! Walks full pages forward (backwards in time) from the boundary page and
//! streams every in-window post to the output.

use crate::crawler::{CrawlContext, CrawlError};
use crate::feed::PageRequest;
use crate::output::{format_record, RecordStream};
use crate::state::SequenceCounter;

/// What a completed crawl saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Pages fetched, including the final empty one if any
    pub pages: u64,

    /// Records written
    pub emitted: u64,

    /// Posts newer than the window that were passed over
    pub skipped_newer: u64,

    /// True if the crawl stopped at a post older than the window
    pub reached_lower: bool,
}

/// Crawls `account` from `start_page` until the feed runs dry or the window ends
///
/// Each emitted post takes the next id from `counter`. The courtesy delay
/// follows every page fetch, failed or not.
pub async fn crawl_window<S: RecordStream>(
    ctx: &CrawlContext<'_>,
    account: &str,
    start_page: u64,
    counter: &mut SequenceCounter,
    stream: &mut S,
) -> Result<CrawlOutcome, CrawlError> {
    let mut outcome = CrawlOutcome::default();
    let mut page = start_page.max(1);

    loop {
        let fetched = ctx
            .fetch(PageRequest::new(account, page, ctx.page_size))
            .await;
        ctx.pause(ctx.courtesy_delay).await?;
        let posts = fetched?;
        outcome.pages += 1;

        tracing::debug!("Page {} of {}: {} posts", page, account, posts.len());
        if posts.is_empty() {
            break;
        }

        for post in &posts {
            if ctx.window.is_before_lower(post.created_at) {
                tracing::debug!(
                    "Reached lower edge on page {} at post {} ({})",
                    page,
                    post.id,
                    post.created_at
                );
                outcome.reached_lower = true;
                return Ok(outcome);
            }
            if !ctx.window.contains(post.created_at) {
                outcome.skipped_newer += 1;
                continue;
            }

            let id = counter.next_id();
            stream.write_record(&format_record(post, id))?;
            outcome.emitted += 1;
        }

        page += 1;
    }

    Ok(outcome)
}
