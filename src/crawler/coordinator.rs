//! Lookup coordinator - top-level run orchestration
//!
//! This module wires the configured collaborators together and runs a lookup:
//! - Building the HTTP fetcher and snapshot writer from configuration
//! - Running the batch scheduler over the certificate list
//! - Abandoning the run on an external interrupt
//! - Summarizing and handing the ordered records to the report sink

use crate::certificate::{CertificateId, LookupRecord};
use crate::config::Config;
use crate::crawler::fetcher::{HttpPageFetcher, PageFetcher};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::scheduler::BatchScheduler;
use crate::crawler::snapshot::{DiagnosticSnapshot, HtmlSnapshotWriter};
use crate::crawler::worker::ItemWorker;
use crate::output::{log_statistics, LookupStatistics, ReportSink};
use crate::LookupError;
use indicatif::ProgressBar;
use std::future::Future;
use std::sync::Arc;

/// Main lookup coordinator structure
pub struct Coordinator {
    config: Config,
    scheduler: BatchScheduler,
}

impl Coordinator {
    /// Creates a coordinator using the HTTP fetcher and HTML snapshot writer
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(LookupError)` - The base URL in the configuration is invalid
    pub fn new(config: Config) -> Result<Self, LookupError> {
        let fetcher = Arc::new(HttpPageFetcher::from_config(&config.fetch)?);
        let snapshot = Arc::new(HtmlSnapshotWriter::from_config(&config)?);
        Ok(Self::with_collaborators(config, fetcher, snapshot))
    }

    /// Creates a coordinator around arbitrary fetch and snapshot capabilities
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        snapshot: Arc<dyn DiagnosticSnapshot>,
    ) -> Self {
        let worker = ItemWorker::new(
            fetcher,
            snapshot,
            RetryPolicy::from_config(&config.retry),
            config.fetch.timeout(),
        );
        let scheduler = BatchScheduler::from_config(worker, &config.batch);

        Self { config, scheduler }
    }

    /// Advances `progress` once per completed certificate
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.scheduler = self.scheduler.with_progress(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up every certificate, returning records in input order
    pub async fn run(&self, ids: &[CertificateId]) -> Result<Vec<LookupRecord>, LookupError> {
        tracing::info!(
            "Looking up {} certificates (concurrency: {}, timeout: {}ms, retries: {}, retry delay: {}s, rate limit: {}s)",
            ids.len(),
            self.scheduler.concurrency(),
            self.config.fetch.timeout_ms,
            self.config.retry.max_retries,
            self.config.retry.base_delay_secs,
            self.config.batch.rate_limit_secs
        );

        self.scheduler.run(ids).await
    }

    /// Like `run`, but gives up as soon as `shutdown` completes
    ///
    /// In-flight lookups are abandoned and no partial records are returned.
    pub async fn run_until<F>(
        &self,
        ids: &[CertificateId],
        shutdown: F,
    ) -> Result<Vec<LookupRecord>, LookupError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run(ids) => result,
            _ = shutdown => {
                tracing::info!("Process interrupted by user");
                Err(LookupError::Interrupted)
            }
        }
    }
}

/// Runs a complete lookup and writes the report
///
/// This function:
/// 1. Runs every certificate through the coordinator
/// 2. Stops early without writing anything if `shutdown` fires
/// 3. Logs run statistics
/// 4. Hands the ordered records to `sink`
///
/// # Returns
///
/// * `Ok(LookupStatistics)` - Lookup completed and the report was written
/// * `Err(LookupError::Interrupted)` - The run was interrupted
/// * `Err(LookupError)` - A lookup task failed or the report could not be written
pub async fn run_lookup<F>(
    coordinator: &Coordinator,
    ids: &[CertificateId],
    sink: &dyn ReportSink,
    shutdown: F,
) -> Result<LookupStatistics, LookupError>
where
    F: Future<Output = ()>,
{
    let records = coordinator.run_until(ids, shutdown).await?;

    let stats = LookupStatistics::from_records(&records);
    log_statistics(&stats);

    sink.write_report(&records)?;
    tracing::info!("Saved results to {}", sink.describe());

    Ok(stats)
}
