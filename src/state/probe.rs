//! Narrowing state for the boundary search
//!
//! The boundary locator brackets the window's upper edge with exponential
//! probes, then walks the bracket back towards page 1. All of the walk's
//! state lives in [`ProbeState`], which is `Copy` and transformed by value so
//! each step can be tested without a feed.

use crate::state::TimeWindow;
use chrono::{DateTime, Utc};

/// How the next narrowing step moves the probe offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Subtract half of the remaining gap
    Binary,
    /// Subtract one
    Linear,
}

/// Scan state carried between narrowing steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeState {
    /// Probe offset, in units of base pages
    pub current: u64,

    /// Last probe offset known to be newer than the upper edge
    pub lower_bracket: u64,

    /// Once set, every later step is linear. Never cleared.
    pub close: bool,
}

impl ProbeState {
    /// State right after the doubling phase bracketed the boundary at `probe`
    pub fn bracketed(probe: u64, close: bool) -> Self {
        Self {
            current: probe,
            lower_bracket: probe / 2,
            close,
        }
    }

    /// Distance between the current offset and the lower bracket
    pub fn gap(&self) -> u64 {
        self.current.saturating_sub(self.lower_bracket)
    }

    /// True once the offset has reached page 1
    pub fn is_settled(&self) -> bool {
        self.current <= 1
    }

    /// The mode the next call to [`step`](Self::step) will use
    pub fn next_mode(&self) -> StepMode {
        if self.close || self.gap() <= 1 {
            StepMode::Linear
        } else {
            StepMode::Binary
        }
    }

    /// Moves the offset one narrowing step towards page 1
    ///
    /// Binary steps subtract `gap / 2`, which is at least 1 whenever the step
    /// is binary, so every step strictly decreases `current`.
    pub fn step(self) -> Self {
        let mode = self.next_mode();
        let decrement = match mode {
            StepMode::Linear => 1,
            StepMode::Binary => self.gap() / 2,
        };
        Self {
            current: self.current.saturating_sub(decrement).max(1),
            close: self.close || mode == StepMode::Linear,
            ..self
        }
    }

    /// Folds a probe sample into the state
    ///
    /// Returns the updated state and whether the search is finished: either
    /// the sample is newer than the window's upper edge or the offset has
    /// reached page 1. An empty probe (offset past the end of the feed)
    /// leaves the state unchanged.
    pub fn observe(self, sample: Option<DateTime<Utc>>, window: &TimeWindow) -> (Self, bool) {
        match sample {
            Some(ts) => {
                let next = Self {
                    close: self.close || window.is_after_lower(ts),
                    ..self
                };
                (next, window.is_after_upper(ts) || next.is_settled())
            }
            None => (self, self.is_settled()),
        }
    }

    /// The page the crawl should start from
    pub fn start_page(&self) -> u64 {
        self.current.max(1)
    }
}
