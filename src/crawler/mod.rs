//! Crawler module for certificate page lookups
//!
//! This module contains the fetch orchestration engine, including:
//! - Isolated page sessions and the HTTP page fetcher
//! - HTML field extraction
//! - Linear-backoff retry policy and per-certificate worker
//! - Dispatch rate limiting and windowed batch scheduling
//! - Diagnostic snapshots for unresolved certificates
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod rate_limiter;
mod retry;
mod scheduler;
mod session;
mod snapshot;
mod worker;

pub use coordinator::{run_lookup, Coordinator};
pub use fetcher::{FailureKind, FetchOutcome, HttpPageFetcher, PageFetcher};
pub use parser::{extract_card_fields, CardFields, ExtractionError};
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;
pub use scheduler::BatchScheduler;
pub use session::{LoadedPage, PageSession, SessionError, SessionFactory};
pub use snapshot::{DiagnosticSnapshot, HtmlSnapshotWriter, SnapshotError};
pub use worker::ItemWorker;
