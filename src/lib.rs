//! cert-lookup: batch certificate lookups against a grading site
//!
//! This crate fetches the card name and grade for a list of certificate IDs
//! from pages rendered for humans, retrying failed lookups with linear backoff,
//! pacing dispatch within bounded concurrency windows, and saving a raw page
//! snapshot for every certificate that could not be resolved.

pub mod certificate;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cert-lookup operations
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Run interrupted before completion")]
    Interrupted,
}

/// Configuration and input errors
///
/// All of these are fatal and are raised before any fetch work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read input file {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No certificate IDs found in {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Invalid certificate ID: {0:?}")]
    InvalidId(String),
}

/// Result type alias for cert-lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use certificate::{load_certificate_ids, CertificateId, LookupRecord};
pub use config::Config;
pub use crawler::{BatchScheduler, FailureKind, FetchOutcome, PageFetcher};
pub use state::{AttemptState, ItemPhase};
