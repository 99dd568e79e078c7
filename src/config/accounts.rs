//! Account queue loading
//!
//! The queue is a plain text file with one handle per line. Handles become
//! output file names, so anything outside `[A-Za-z0-9_]` is rejected.

use crate::ConfigError;
use std::path::Path;

/// Reads the ordered account queue from `path`
///
/// Blank lines and `#` comments are ignored, surrounding whitespace and a
/// leading `@` are stripped. Invalid handles are skipped with a warning.
pub fn load_accounts(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let accounts = parse_accounts(&content);
    tracing::info!(
        "Read {} accounts from {}",
        accounts.len(),
        path.display()
    );
    Ok(accounts)
}

/// Parses account handles from newline-delimited text
pub fn parse_accounts(content: &str) -> Vec<String> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            let handle = line.strip_prefix('@').unwrap_or(line);
            if is_valid_handle(handle) {
                Some(handle.to_string())
            } else {
                tracing::warn!("Skipping invalid account handle on line {}: '{}'", index + 1, line);
                None
            }
        })
        .collect()
}

/// Returns true if `handle` is non-empty and only `[A-Za-z0-9_]`
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty() && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
