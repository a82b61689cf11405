//! Certificate module for lookup inputs and outputs
//!
//! This module defines the identifiers being looked up, the per-certificate
//! record produced by a lookup, and loading of newline-delimited ID lists.

mod id;
mod input;
mod record;

// Re-export main types
pub use id::CertificateId;
pub use input::{load_certificate_ids, parse_certificate_ids};
pub use record::{LookupRecord, SENTINEL};
