use crate::ConfigError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;

/// Characters left unescaped when an ID becomes a path segment or file name
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// An opaque, non-empty certificate identifier
///
/// Identifiers are not required to be unique; duplicates in an input list are
/// looked up independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateId(String);

impl CertificateId {
    /// Creates an identifier from a raw token
    ///
    /// Surrounding whitespace is trimmed. Returns an error if nothing remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use cert_lookup::CertificateId;
    ///
    /// let id = CertificateId::new("  A1001 ").unwrap();
    /// assert_eq!(id.as_str(), "A1001");
    /// assert!(CertificateId::new("   ").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier percent-encoded as a single path segment
    ///
    /// Everything except ASCII letters, digits and `-_.~` is escaped, so the
    /// result never contains a separator, a scheme, a query or a fragment.
    ///
    /// ```
    /// use cert_lookup::CertificateId;
    ///
    /// let id = CertificateId::new("AB:12/3?x").unwrap();
    /// assert_eq!(id.encoded(), "AB%3A12%2F3%3Fx");
    /// ```
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.0, ID_SEGMENT).to_string()
    }

    /// Returns true if the identifier is `.` or `..`
    ///
    /// Such an identifier is normalized away by any URL parser and cannot
    /// address a page of its own.
    pub fn is_dot_segment(&self) -> bool {
        matches!(self.0.as_str(), "." | "..")
    }

    /// Returns a file name stem unique to this identifier
    ///
    /// The stem is the encoded form, so distinct IDs never share a snapshot
    /// file and no ID can escape the debug directory.
    pub fn file_stem(&self) -> String {
        self.encoded()
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CertificateId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CertificateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
