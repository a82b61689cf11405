//! Statistics for a completed lookup run
//!
//! This module summarizes the final records: how many certificates resolved,
//! how many fell back to the sentinel, and which ones.

use crate::certificate::LookupRecord;

/// Lookup run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupStatistics {
    /// Number of certificates looked up
    pub total: usize,

    /// Number of certificates whose fields were extracted
    pub succeeded: usize,

    /// Number of certificates recorded with sentinel values
    pub failed: usize,

    /// IDs of the failed certificates, in input order
    pub failed_ids: Vec<String>,
}

impl LookupStatistics {
    /// Builds statistics from the final record list
    pub fn from_records(records: &[LookupRecord]) -> Self {
        let failed_ids: Vec<String> = records
            .iter()
            .filter(|record| record.is_failed())
            .map(|record| record.id.to_string())
            .collect();

        Self {
            total: records.len(),
            succeeded: records.len() - failed_ids.len(),
            failed: failed_ids.len(),
            failed_ids,
        }
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

/// Logs statistics at info level, listing failed IDs at warn level
pub fn log_statistics(stats: &LookupStatistics) {
    tracing::info!(
        "Lookup complete: {} certificates, {} resolved, {} failed ({:.1}% success)",
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.success_rate()
    );

    if !stats.failed_ids.is_empty() {
        tracing::warn!(
            "Certificates recorded as Error: {}",
            stats.failed_ids.join(", ")
        );
    }
}
