//! Configuration module for Timeline-Corpus
//!
//! This module handles loading, parsing, and validating the TOML
//! configuration file, and reading the account queue.
//!
//! # Example
//!
//! ```no_run
//! use timeline_corpus::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("corpus.toml")).unwrap();
//! println!("Crawling window from {}", config.window.lower);
//! ```

mod accounts;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, CrawlerConfig, UserAgentConfig, WindowConfig};

// Re-export parser functions
pub use accounts::{is_valid_handle, load_accounts, parse_accounts};
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
