//! Output module for lookup reports
//!
//! This module handles:
//! - Writing the final CSV report
//! - Summarizing run statistics

mod csv_report;
pub mod stats;
mod traits;

pub use csv_report::{format_csv_report, CsvReport, REPORT_HEADER};
pub use stats::{log_statistics, LookupStatistics};
pub use traits::{OutputError, OutputResult, ReportSink};
