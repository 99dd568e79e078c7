//! Feed module for reading account timelines
//!
//! This module defines the one capability the crawler needs from the remote
//! API: fetch a page of posts for an account, newest first. It contains:
//! - The `Post` data model
//! - The `FeedClient` trait and its typed failures
//! - An HTTP implementation backed by reqwest

mod http;
mod post;

pub use http::{build_http_client, parse_created_at, parse_retry_after, HttpFeedClient};
pub use post::{GeoLocation, Post};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures a feed fetch can report
///
/// The retry controller matches on this exhaustively; each variant has its
/// own recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Transient transport failure
    #[error("Network failure: {0}")]
    Network(String),

    /// The provider asked for a cool-down
    #[error("Rate limit exceeded, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Not found, forbidden or unauthorized
    #[error("Access denied (HTTP {status})")]
    AccessDenied { status: u16 },
}

/// One fetch unit: page `page` of size `count` from `account`'s feed
///
/// Page 1 is the most recent. Page `p` covers feed items
/// `(p - 1) * count .. p * count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub account: &'a str,
    pub page: u64,
    pub count: u32,
}

impl<'a> PageRequest<'a> {
    pub fn new(account: &'a str, page: u64, count: u32) -> Self {
        Self {
            account,
            page,
            count,
        }
    }

    /// A single-item request sampling the post at absolute position
    /// `offset` (1-based)
    pub fn probe(account: &'a str, offset: u64) -> Self {
        Self::new(account, offset, 1)
    }
}

/// Trait for timeline providers
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetches one page of posts, most recent first
    ///
    /// An empty vector means the page lies past the end of the feed.
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<Post>, FeedError>;
}
