//! Output module for writing corpus files and run reports
//!
//! This module handles:
//! - Serializing posts into the corpus record layout
//! - Writing per-account corpus files
//! - Recording per-account outcomes and run statistics

mod record;
pub mod stats;
mod writer;

pub use record::{format_record, join_entities, parse_record, ParsedRecord};
pub use stats::{print_summary, AccountReport, RunSummary};
pub use writer::{CorpusWriter, FileCorpusWriter, FileRecordStream, RecordStream};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format record: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
