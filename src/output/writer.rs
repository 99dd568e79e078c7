//! Corpus writer traits and the file-backed implementation
//!
//! A stream is opened per account per attempt. Each open truncates, so a
//! retried attempt starts from an empty corpus file.

use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Opens per-account record streams
pub trait CorpusWriter {
    type Stream: RecordStream;

    /// Opens (and truncates) the output for `account`
    fn open(&self, account: &str) -> OutputResult<Self::Stream>;
}

/// Append-only stream of serialized records for one account
pub trait RecordStream {
    /// Appends one record
    fn write_record(&mut self, record: &str) -> OutputResult<()>;

    /// Number of records written so far
    fn records_written(&self) -> u64;

    /// Finishes the output and returns the record count
    ///
    /// An output with zero records is discarded.
    fn close(self) -> OutputResult<u64>;

    /// Discards the output of a failed attempt
    fn abandon(self) -> OutputResult<()>;
}

/// Writes one file per account, named after the handle, into a directory
#[derive(Debug, Clone)]
pub struct FileCorpusWriter {
    dir: PathBuf,
}

impl FileCorpusWriter {
    /// Creates a writer for `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> OutputResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the corpus file for `account`
    pub fn path_for(&self, account: &str) -> PathBuf {
        self.dir.join(account)
    }
}

impl CorpusWriter for FileCorpusWriter {
    type Stream = FileRecordStream;

    fn open(&self, account: &str) -> OutputResult<FileRecordStream> {
        let path = self.path_for(account);
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(b"[\n")?;
        tracing::debug!("Opened corpus file: {}", path.display());

        Ok(FileRecordStream {
            writer,
            path,
            records: 0,
        })
    }
}

/// A bracketed, comma-separated record list being written to disk
#[derive(Debug)]
pub struct FileRecordStream {
    writer: BufWriter<File>,
    path: PathBuf,
    records: u64,
}

impl RecordStream for FileRecordStream {
    fn write_record(&mut self, record: &str) -> OutputResult<()> {
        if self.records > 0 {
            self.writer.write_all(b",\n")?;
        }
        self.writer.write_all(record.as_bytes())?;
        self.records += 1;
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.records
    }

    fn close(mut self) -> OutputResult<u64> {
        if self.records > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(b"]\n")?;
        self.writer.flush()?;
        drop(self.writer);

        if self.records == 0 {
            std::fs::remove_file(&self.path)?;
            tracing::debug!("Discarded empty corpus file: {}", self.path.display());
        } else {
            tracing::debug!("Closed corpus file: {}", self.path.display());
        }

        Ok(self.records)
    }

    fn abandon(self) -> OutputResult<()> {
        drop(self.writer);
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
