//! Timeline-Corpus: a bounded timeline crawler
//!
//! This crate pages through an account's reverse-chronological post feed,
//! locates the page where a fixed time window begins, and writes every post
//! inside that window to a per-account corpus file. Transient network errors,
//! provider rate limiting and inaccessible accounts are each handled with
//! their own recovery policy.

pub mod config;
pub mod crawler;
pub mod feed;
pub mod output;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

/// Main error type for Timeline-Corpus operations
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] feed::FeedError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run interrupted by shutdown request")]
    Interrupted,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),
}

/// Result type alias for Timeline-Corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Shutdown};
pub use feed::{FeedClient, FeedError, HttpFeedClient, Post};
pub use output::{FileCorpusWriter, RunSummary};
pub use state::{AccountState, SequenceCounter, TimeWindow};
