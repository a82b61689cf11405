use crate::certificate::CertificateId;
use crate::ConfigError;
use std::path::Path;

/// Loads certificate IDs from a newline-delimited text file
///
/// Each non-blank line is one identifier; surrounding whitespace is trimmed
/// and blank lines are skipped. No other validation is performed.
///
/// # Arguments
///
/// * `path` - Path to the input file
///
/// # Returns
///
/// * `Ok(Vec<CertificateId>)` - The identifiers in file order
/// * `Err(ConfigError::InputNotFound)` - The file does not exist
/// * `Err(ConfigError::InputUnreadable)` - The file could not be read
/// * `Err(ConfigError::EmptyInput)` - The file holds no usable identifiers
pub fn load_certificate_ids(path: &Path) -> Result<Vec<CertificateId>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::InputNotFound(path.to_path_buf()));
    }

    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let ids = parse_certificate_ids(&content);
    if ids.is_empty() {
        return Err(ConfigError::EmptyInput(path.to_path_buf()));
    }

    tracing::info!("Loaded {} certificate IDs from {}", ids.len(), path.display());
    Ok(ids)
}

/// Parses identifiers from newline-delimited text, skipping blank lines
pub fn parse_certificate_ids(content: &str) -> Vec<CertificateId> {
    content
        .lines()
        .filter_map(|line| CertificateId::new(line).ok())
        .collect()
}
