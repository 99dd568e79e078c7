//! Boundary locator
//!
//! The feed can only be addressed by page, not by time. To find the page
//! where the window begins, the locator samples single posts at page
//! boundaries:
//!
//! 1. Doubling phase: probe base pages 1, 2, 4, 8, ... until a sample is at
//!    or before the window's upper edge, or the feed runs out. This brackets
//!    the boundary between `probe / 2` and `probe` in O(log distance) probes.
//! 2. Narrowing phase: walk back from `probe` (binary steps while the
//!    bracket is wide, single steps once close) until a sample is newer than
//!    the upper edge or page 1 is reached.
//!
//! Every page before the returned one holds only posts newer than the upper
//! edge, so no in-window post is skipped.

use crate::crawler::{CrawlContext, CrawlError};
use crate::state::ProbeState;

/// Result of a boundary search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// First page to crawl (1-based)
    pub page: u64,

    /// Probes spent in the doubling phase
    pub doubling_probes: u32,

    /// Probes spent in the narrowing phase
    pub narrowing_probes: u32,
}

impl Boundary {
    pub fn total_probes(&self) -> u32 {
        self.doubling_probes + self.narrowing_probes
    }
}

/// Finds the first page of `account`'s feed worth crawling
pub async fn locate_boundary(ctx: &CrawlContext<'_>, account: &str) -> Result<Boundary, CrawlError> {
    tracing::debug!("Doubling phase: start for {}", account);

    let mut doubling_probes = 0u32;
    let mut probe: u64 = 1;
    let mut state = loop {
        let sample = ctx.probe(account, probe).await?;
        doubling_probes += 1;

        match sample {
            None => {
                tracing::debug!("Doubling phase: feed ends before probe {}", probe);
                break ProbeState::bracketed(probe, false);
            }
            Some(ts) if ctx.window.is_at_or_before_upper(ts) => {
                tracing::debug!("Doubling phase: bracketed at probe {} ({})", probe, ts);
                break ProbeState::bracketed(probe, ctx.window.is_after_lower(ts));
            }
            Some(_) => match probe.checked_mul(2) {
                Some(next) => {
                    probe = next;
                    tracing::debug!("Doubling phase: doubling, going to probe {}", probe);
                }
                None => break ProbeState::bracketed(probe, false),
            },
        }
    };

    let mut narrowing_probes = 0u32;
    while !state.is_settled() {
        let mode = state.next_mode();
        state = state.step();
        tracing::debug!(
            "Narrowing phase: {:?} step, gap {}, probing offset {}",
            mode,
            state.gap(),
            state.current
        );

        let sample = ctx.probe(account, state.current).await?;
        narrowing_probes += 1;

        let (next, found) = state.observe(sample, &ctx.window);
        state = next;
        if found {
            break;
        }
    }

    let boundary = Boundary {
        page: state.start_page(),
        doubling_probes,
        narrowing_probes,
    };
    tracing::info!(
        "Boundary for {} at page {} ({} probes)",
        account,
        boundary.page,
        boundary.total_probes()
    );
    Ok(boundary)
}
