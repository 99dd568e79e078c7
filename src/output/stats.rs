//! Run statistics
//!
//! This module collects per-account outcomes from a run and prints them.

use crate::state::AccountState;
use std::time::Duration;

/// Outcome of one account's crawl
#[derive(Debug, Clone, PartialEq)]
pub struct AccountReport {
    /// The account handle
    pub account: String,

    /// Terminal state reached by the retry controller
    pub state: AccountState,

    /// Attempts made, including the successful one
    pub attempts: u32,

    /// Records kept in the corpus file
    pub records: u64,

    /// Description of the last failure, if any
    pub last_failure: Option<String>,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-account reports, in queue order
    pub accounts: Vec<AccountReport>,

    /// Accounts never started because the run was interrupted
    pub skipped: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: AccountReport) {
        self.accounts.push(report);
    }

    pub fn count_in_state(&self, state: AccountState) -> usize {
        self.accounts.iter().filter(|r| r.state == state).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count_in_state(AccountState::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.accounts.iter().filter(|r| r.state.is_failure()).count()
    }

    /// Total records written across all accounts
    pub fn total_records(&self) -> u64 {
        self.accounts.iter().map(|r| r.records).sum()
    }

    pub fn was_interrupted(&self) -> bool {
        self.count_in_state(AccountState::Interrupted) > 0 || self.skipped > 0
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Corpus Statistics ===\n");

    println!("Overview:");
    println!("  Accounts processed: {}", summary.accounts.len());
    println!("  Succeeded: {}", summary.succeeded());
    println!("  Failed: {}", summary.failed());
    if summary.skipped > 0 {
        println!("  Not started: {}", summary.skipped);
    }
    println!("  Records written: {}", summary.total_records());
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    if summary.accounts.is_empty() {
        return;
    }

    println!("Accounts:");
    for report in &summary.accounts {
        match &report.last_failure {
            Some(failure) if !report.state.is_success() => println!(
                "  {}: {} after {} attempt(s) ({})",
                report.account, report.state, report.attempts, failure
            ),
            _ => println!(
                "  {}: {} after {} attempt(s), {} record(s)",
                report.account, report.state, report.attempts, report.records
            ),
        }
    }
}
