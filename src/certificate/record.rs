use crate::certificate::CertificateId;

/// Value written to both fields of a certificate that could not be resolved
pub const SENTINEL: &str = "Error";

/// Terminal result of looking up one certificate
///
/// A record is produced exactly once per input identifier and is never
/// modified afterwards. Failed lookups carry the sentinel pair
/// `("Error", "Error")` so the row stays visible in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRecord {
    /// The certificate that was looked up
    pub id: CertificateId,

    /// Extracted card name, or the sentinel
    pub card_name: String,

    /// Extracted grade, or the sentinel
    pub grade: String,
}

impl LookupRecord {
    /// Creates a record for a successful lookup
    pub fn found(id: CertificateId, card_name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            id,
            card_name: card_name.into(),
            grade: grade.into(),
        }
    }

    /// Creates a record for a certificate whose retries were exhausted
    pub fn failed(id: CertificateId) -> Self {
        Self {
            id,
            card_name: SENTINEL.to_string(),
            grade: SENTINEL.to_string(),
        }
    }

    /// Returns true if this record carries the sentinel values
    pub fn is_failed(&self) -> bool {
        self.card_name == SENTINEL && self.grade == SENTINEL
    }

    /// Returns the record as a report row: ID, card name, grade
    pub fn as_row(&self) -> [&str; 3] {
        [self.id.as_str(), &self.card_name, &self.grade]
    }
}
