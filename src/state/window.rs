//! Time window definitions for selecting in-scope posts

use crate::ConfigError;
use chrono::{DateTime, Utc};
use std::fmt;

/// A closed interval `[lower, upper]` of instants
///
/// The window is fixed for a whole run. Every predicate below compares a post
/// timestamp against one of the two edges; the feed is newest-first, so
/// "after upper" means the post is too recent and "before lower" means the
/// crawl has walked past the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window, rejecting inverted bounds
    pub fn new(lower: DateTime<Utc>, upper: DateTime<Utc>) -> Result<Self, ConfigError> {
        if lower > upper {
            return Err(ConfigError::InvalidWindow(format!(
                "lower edge {} is after upper edge {}",
                lower.to_rfc3339(),
                upper.to_rfc3339()
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> DateTime<Utc> {
        self.lower
    }

    pub fn upper(&self) -> DateTime<Utc> {
        self.upper
    }

    /// Returns true if `ts` lies inside the closed interval
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.lower && ts <= self.upper
    }

    /// Returns true if `ts` is strictly newer than the upper edge
    pub fn is_after_upper(&self, ts: DateTime<Utc>) -> bool {
        ts > self.upper
    }

    /// Returns true if `ts` is at or older than the upper edge
    pub fn is_at_or_before_upper(&self, ts: DateTime<Utc>) -> bool {
        ts <= self.upper
    }

    /// Returns true if `ts` is strictly newer than the lower edge
    pub fn is_after_lower(&self, ts: DateTime<Utc>) -> bool {
        ts > self.lower
    }

    /// Returns true if `ts` is strictly older than the lower edge
    pub fn is_before_lower(&self, ts: DateTime<Utc>) -> bool {
        ts < self.lower
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.lower.to_rfc3339(),
            self.upper.to_rfc3339()
        )
    }
}
