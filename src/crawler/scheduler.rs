//! Batch scheduler for windowed, rate-limited lookups
//!
//! This module handles:
//! - Partitioning the certificate list into fixed-size windows
//! - Pacing dispatch within a window via the rate limiter
//! - Running each window's lookups concurrently and draining it fully
//! - Reassembling records in input order regardless of completion order

use crate::certificate::{CertificateId, LookupRecord};
use crate::config::BatchConfig;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::worker::ItemWorker;
use crate::LookupError;
use indicatif::ProgressBar;
use tokio::task::JoinSet;

/// Runs certificate lookups in strictly sequential concurrency windows
///
/// At most `concurrency` lookups are in flight at any moment: a window is
/// dispatched, then fully drained before the next one starts.
pub struct BatchScheduler {
    worker: ItemWorker,
    concurrency: usize,
    limiter: RateLimiter,
    progress: ProgressBar,
}

impl BatchScheduler {
    /// Creates a new scheduler
    ///
    /// A concurrency of zero is treated as one.
    pub fn new(worker: ItemWorker, concurrency: usize, limiter: RateLimiter) -> Self {
        Self {
            worker,
            concurrency: concurrency.max(1),
            limiter,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn from_config(worker: ItemWorker, config: &BatchConfig) -> Self {
        Self::new(
            worker,
            config.concurrency,
            RateLimiter::new(config.rate_limit()),
        )
    }

    /// Advances `progress` once per completed certificate
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Looks up every certificate and returns one record per input, in order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<LookupRecord>)` - Records in the same order as `ids`
    /// * `Err(LookupError)` - A lookup task panicked or was cancelled
    pub async fn run(&self, ids: &[CertificateId]) -> Result<Vec<LookupRecord>, LookupError> {
        let mut records = Vec::with_capacity(ids.len());
        let window_count = ids.len().div_ceil(self.concurrency);

        for (window_index, window) in ids.chunks(self.concurrency).enumerate() {
            tracing::debug!(
                "Dispatching window {}/{} ({} certificates)",
                window_index + 1,
                window_count,
                window.len()
            );
            let window_records = self.run_window(window).await?;
            records.extend(window_records);
        }

        Ok(records)
    }

    /// Dispatches one window and waits for every lookup in it to finish
    async fn run_window(&self, window: &[CertificateId]) -> Result<Vec<LookupRecord>, LookupError> {
        let mut tasks = JoinSet::new();

        for (index, id) in window.iter().enumerate() {
            self.limiter.pace(index).await;

            let worker = self.worker.clone();
            let id = id.clone();
            tasks.spawn(async move { (index, worker.run(id).await) });
        }

        let mut completed = Vec::with_capacity(window.len());

        while let Some(joined) = tasks.join_next().await {
            let (index, record) = joined?;
            tracing::debug!(
                "Certificate {} completed: {} / {}",
                record.id,
                record.card_name,
                record.grade
            );
            self.progress.inc(1);
            completed.push((index, record));
        }

        // Every spawned task yields exactly one record tagged with its position
        completed.sort_unstable_by_key(|(index, _)| *index);
        let records = completed.into_iter().map(|(_, record)| record).collect();

        Ok(records)
    }
}
