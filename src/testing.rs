//! Test helpers: an in-memory feed and a fixed time base

use crate::crawler::{CrawlContext, Shutdown, Sleeper};
use crate::feed::{FeedClient, FeedError, PageRequest, Post};
use crate::state::TimeWindow;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Timestamp of the newest post of every hourly account
pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 5, 30, 12, 0, 0).unwrap()
}

/// Window covering hourly posts `newest..=oldest` (indices into the feed)
pub(crate) fn window_between(newest: usize, oldest: usize) -> TimeWindow {
    TimeWindow::new(
        base_time() - ChronoDuration::hours(oldest as i64),
        base_time() - ChronoDuration::hours(newest as i64),
    )
    .unwrap()
}

pub(crate) fn test_context<'a>(
    feed: &'a dyn FeedClient,
    sleeper: &'a dyn Sleeper,
    shutdown: &'a Shutdown,
    window: TimeWindow,
) -> CrawlContext<'a> {
    CrawlContext {
        client: feed,
        sleeper,
        shutdown,
        window,
        page_size: 100,
        courtesy_delay: Duration::from_millis(5000),
    }
}

/// An in-memory timeline provider
///
/// Unknown accounts answer with `AccessDenied { status: 404 }`. Every call is
/// logged, including failed ones.
#[derive(Default)]
pub(crate) struct SyntheticFeed {
    accounts: HashMap<String, Vec<Post>>,
    queued_failures: Mutex<VecDeque<FeedError>>,
    failure_at: Option<(usize, FeedError)>,
    always: Option<FeedError>,
    requests: Mutex<Vec<(String, u64, u32)>>,
}

impl SyntheticFeed {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an account whose posts carry `timestamps`, newest first
    pub(crate) fn with_account(mut self, account: &str, timestamps: Vec<DateTime<Utc>>) -> Self {
        let len = timestamps.len() as u64;
        let posts = timestamps
            .into_iter()
            .enumerate()
            .map(|(i, ts)| {
                let mut post = Post::new(1_000_000 + len - i as u64, account, ts, &format!("post {}", i));
                post.retweet_count = i as u64 % 7;
                post.hashtags = vec![format!("tag{}", i % 3)];
                post
            })
            .collect();
        self.accounts.insert(account.to_string(), posts);
        self
    }

    /// Adds an account with `count` posts one hour apart, the newest at
    /// [`base_time`]
    pub(crate) fn with_hourly_account(self, account: &str, count: usize) -> Self {
        let timestamps = (0..count)
            .map(|i| base_time() - ChronoDuration::hours(i as i64))
            .collect();
        self.with_account(account, timestamps)
    }

    /// The next calls fail with `errors`, in order
    pub(crate) fn fail_first(self, errors: Vec<FeedError>) -> Self {
        if let Ok(mut queued) = self.queued_failures.lock() {
            queued.extend(errors);
        }
        self
    }

    /// Call number `n` (1-based) fails with `error`
    pub(crate) fn fail_on_request(mut self, n: usize, error: FeedError) -> Self {
        self.failure_at = Some((n, error));
        self
    }

    /// Every call fails with `error`
    pub(crate) fn fail_always(mut self, error: FeedError) -> Self {
        self.always = Some(error);
        self
    }

    /// Logged calls as `(account, page, count)`
    pub(crate) fn requests(&self) -> Vec<(String, u64, u32)> {
        self.requests.lock().unwrap().clone()
    }

    /// Provider id of the post at `index` in `account`'s feed
    pub(crate) fn post_id(&self, account: &str, index: usize) -> u64 {
        self.accounts[account][index].id
    }
}

#[async_trait]
impl FeedClient for SyntheticFeed {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<Post>, FeedError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((request.account.to_string(), request.page, request.count));
            requests.len()
        };

        if let Some((n, error)) = &self.failure_at {
            if *n == call {
                return Err(error.clone());
            }
        }
        if let Some(error) = self.queued_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        if let Some(error) = &self.always {
            return Err(error.clone());
        }

        let posts = self
            .accounts
            .get(request.account)
            .ok_or(FeedError::AccessDenied { status: 404 })?;

        if request.page == 0 {
            return Ok(Vec::new());
        }
        let count = request.count as usize;
        let start = ((request.page - 1) as usize).saturating_mul(count);
        let end = start.saturating_add(count).min(posts.len());
        if start >= posts.len() {
            return Ok(Vec::new());
        }
        Ok(posts[start..end].to_vec())
    }
}
