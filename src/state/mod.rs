//! State module for tracking crawl progress
//!
//! This module provides the data model shared by the locator, the crawl
//! engine and the retry controller.
//!
//! # Components
//!
//! - `TimeWindow`: The fixed `[lower, upper]` interval of in-scope posts
//! - `ProbeState`: By-value state of the boundary narrowing walk
//! - `SequenceCounter`: Run-wide record numbering
//! - `AccountState`: Per-account retry state machine

mod account_state;
mod probe;
mod sequence;
mod window;

// Re-export main types
pub use account_state::AccountState;
pub use probe::{ProbeState, StepMode};
pub use sequence::{SequenceCheckpoint, SequenceCounter};
pub use window::TimeWindow;
