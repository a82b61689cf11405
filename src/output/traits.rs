//! Report sink traits and types
//!
//! This module defines the trait interface for report writers and the errors
//! they can raise.

use crate::certificate::LookupRecord;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives the final, ordered list of lookup records
///
/// A sink is handed the records exactly once, after every window has
/// completed. Failure to write is fatal for the run.
pub trait ReportSink: Send + Sync {
    /// Writes one row per record, in the order given
    fn write_report(&self, records: &[LookupRecord]) -> OutputResult<()>;

    /// Human-readable location of the report, for log output
    fn describe(&self) -> String;
}
