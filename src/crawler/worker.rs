//! Item worker: drives one certificate to a terminal record
//!
//! # Lookup Flow
//!
//! 1. Fetch the page (attempt 1)
//! 2. On success, return the extracted fields
//! 3. On failure, if the retry policy allows it, sleep
//!    `backoff_delay(attempt + 1)` and fetch again
//! 4. Once retries are exhausted, capture a diagnostic snapshot and return
//!    the sentinel record
//!
//! Nothing escapes the worker except the record and log events.

use crate::certificate::{CertificateId, LookupRecord};
use crate::crawler::fetcher::{FailureKind, FetchOutcome, PageFetcher};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::snapshot::DiagnosticSnapshot;
use crate::state::AttemptState;
use std::sync::Arc;
use std::time::Duration;

/// Runs lookups for individual certificates
///
/// Cloning is cheap; every clone shares the same fetcher and snapshot
/// capability.
#[derive(Clone)]
pub struct ItemWorker {
    fetcher: Arc<dyn PageFetcher>,
    snapshot: Arc<dyn DiagnosticSnapshot>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl ItemWorker {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        snapshot: Arc<dyn DiagnosticSnapshot>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            snapshot,
            policy,
            timeout,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Looks up `id` until it succeeds or the retry policy gives up
    pub async fn run(&self, id: CertificateId) -> LookupRecord {
        let mut state = AttemptState::new();
        state.start();

        loop {
            match self.fetcher.fetch(&id, self.timeout).await {
                FetchOutcome::Success { card_name, grade } => {
                    state.succeed();
                    return LookupRecord::found(id, card_name, grade);
                }
                FetchOutcome::Failure { kind } => {
                    state.record_failure(kind);
                    self.log_failure(&id, kind, state.attempt_number());

                    if !self.policy.should_retry(state.attempt_number()) {
                        break;
                    }

                    let next_attempt = state.attempt_number() + 1;
                    let delay = self.policy.backoff_delay(next_attempt);
                    state.wait_for_retry();
                    tracing::info!(
                        "Retrying certificate {}, attempt {}/{} in {:?}",
                        id,
                        next_attempt,
                        self.policy.total_attempts(),
                        delay
                    );
                    tokio::time::sleep(delay).await;

                    state.retry();
                }
            }
        }

        tracing::warn!(
            "Certificate {} failed after {} attempts (last failure: {})",
            id,
            state.attempt_number(),
            state
                .last_failure()
                .map(|kind| kind.as_str())
                .unwrap_or("unknown")
        );

        self.snapshot.snapshot(&id, self.timeout).await;
        state.exhaust();
        LookupRecord::failed(id)
    }

    fn log_failure(&self, id: &CertificateId, kind: FailureKind, attempt: u32) {
        match kind {
            FailureKind::Timeout => {
                tracing::warn!("Timeout for certificate {} on attempt {}", id, attempt);
            }
            FailureKind::ExtractionError | FailureKind::TransportError => {
                tracing::error!(
                    "Error fetching certificate {} on attempt {}: {}",
                    id,
                    attempt,
                    kind
                );
            }
        }
    }
}
