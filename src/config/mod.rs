//! Configuration module for cert-lookup
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top in the binary.
//!
//! # Example
//!
//! ```no_run
//! use cert_lookup::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cert-lookup.toml")).unwrap();
//! println!("Lookups per window: {}", config.batch.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, Config, FetchConfig, InputConfig, OutputConfig, RetryConfig, DEFAULT_BASE_URL,
    DEFAULT_CONCURRENCY, DEFAULT_DEBUG_DIR, DEFAULT_INPUT_PATH, DEFAULT_MAX_RETRIES,
    DEFAULT_RATE_LIMIT_SECS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
