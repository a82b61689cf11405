//! CSV report generation
//!
//! The report has a fixed header `Certificate ID,Card Name,Grade` followed by
//! one row per certificate in input order. Fields are quoted only when they
//! contain a comma, quote, or line break.

use crate::certificate::LookupRecord;
use crate::output::traits::{OutputError, OutputResult, ReportSink};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const REPORT_HEADER: [&str; 3] = ["Certificate ID", "Card Name", "Grade"];

/// Writes lookup records to a CSV file
#[derive(Debug, Clone)]
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReport {
    fn write_report(&self, records: &[LookupRecord]) -> OutputResult<()> {
        let csv = format_csv_report(records);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&self.path)?;
            file.write_all(csv.as_bytes())?;
            file.flush()
        };

        write().map_err(|source| OutputError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Formats records as CSV text, header included
///
/// # Example
///
/// ```
/// use cert_lookup::{CertificateId, LookupRecord};
/// use cert_lookup::output::format_csv_report;
///
/// let records = vec![LookupRecord::found(CertificateId::new("A1").unwrap(), "Mew, Promo", "9")];
/// assert_eq!(
///     format_csv_report(&records),
///     "Certificate ID,Card Name,Grade\r\nA1,\"Mew, Promo\",9\r\n"
/// );
/// ```
pub fn format_csv_report(records: &[LookupRecord]) -> String {
    let mut csv = String::new();
    push_row(&mut csv, &REPORT_HEADER);
    for record in records {
        push_row(&mut csv, &record.as_row());
    }
    csv
}

fn push_row(csv: &mut String, fields: &[&str]) {
    let line = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(&line);
    csv.push_str("\r\n");
}

/// Quotes a field if needed, doubling embedded quotes
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
