use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INPUT_PATH: &str = "certs.txt";
pub const DEFAULT_BASE_URL: &str = "https://acegrading.com/cert/";
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 2.0;
pub const DEFAULT_RATE_LIMIT_SECS: f64 = 1.0;
pub const DEFAULT_SETTLE_MS: u64 = 1_500;
pub const DEFAULT_SNAPSHOT_SETTLE_MS: u64 = 2_000;
pub const DEFAULT_DEBUG_DIR: &str = "debug_snapshots";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Main configuration structure for cert-lookup
///
/// Every section and key is optional in the TOML file; missing values take
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub fetch: FetchConfig,
    pub retry: RetryConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the newline-delimited certificate ID list
    pub path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
        }
    }
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL prefix; the certificate ID is appended to form the page URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-fetch timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Time to let a loaded page settle before extraction (milliseconds)
    #[serde(rename = "settle-ms")]
    pub settle_ms: u64,

    /// Time to let a page settle before a diagnostic snapshot (milliseconds)
    #[serde(rename = "snapshot-settle-ms")]
    pub snapshot_settle_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn snapshot_settle(&self) -> Duration {
        Duration::from_millis(self.snapshot_settle_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            snapshot_settle_ms: DEFAULT_SNAPSHOT_SETTLE_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Retry behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay multiplied by the attempt number (seconds)
    #[serde(rename = "base-delay-secs")]
    pub base_delay_secs: f64,
}

impl RetryConfig {
    /// Base delay as a duration
    ///
    /// Values that validation would reject saturate instead of panicking.
    pub fn base_delay(&self) -> Duration {
        seconds_to_duration(self.base_delay_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_secs: DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

/// Batch scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Window size; at most this many lookups are in flight at once
    pub concurrency: usize,

    /// Spacing between dispatches within a window (seconds)
    #[serde(rename = "rate-limit-secs")]
    pub rate_limit_secs: f64,
}

impl BatchConfig {
    /// Rate limit as a duration; out-of-range values saturate
    pub fn rate_limit(&self) -> Duration {
        seconds_to_duration(self.rate_limit_secs)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            rate_limit_secs: DEFAULT_RATE_LIMIT_SECS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV report; derived from the current time when unset
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,

    /// Directory receiving one snapshot per unresolved certificate
    #[serde(rename = "debug-dir")]
    pub debug_dir: String,
}

impl OutputConfig {
    /// Returns the configured report path, or `cert_lookup_results_<timestamp>.csv`
    pub fn resolve_report_path(&self, now: chrono::DateTime<chrono::Local>) -> PathBuf {
        match &self.report_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!(
                "cert_lookup_results_{}.csv",
                now.format("%Y%m%d_%H%M%S")
            )),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: None,
            debug_dir: DEFAULT_DEBUG_DIR.to_string(),
        }
    }
}

/// Negative and NaN become zero, anything too large becomes `Duration::MAX`
fn seconds_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
