//! Account state definitions for the retry controller
//!
//! Each queued account moves from `Attempting` into exactly one terminal
//! state.

use std::fmt;

/// Represents where an account is in the retry state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountState {
    // ===== Active States =====
    /// Attempts are still being made
    Attempting,

    // ===== Terminal Success States =====
    /// An attempt crawled the whole window
    Succeeded,

    // ===== Terminal Error States =====
    /// Attempts ran out, or the account is permanently inaccessible
    Exhausted,

    /// A shutdown was requested while the account was in progress
    Interrupted,
}

impl AccountState {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true if this represents a failed account
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Interrupted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attempting => "attempting",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
