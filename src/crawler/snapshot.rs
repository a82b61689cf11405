//! Diagnostic snapshots for unresolved certificates
//!
//! When a certificate exhausts its retries, the raw page is captured once more
//! in a fresh session and written to `<debug-dir>/<id>.html` for offline
//! inspection. Snapshots are best-effort: failures are logged and swallowed.

use crate::certificate::CertificateId;
use crate::config::Config;
use crate::crawler::session::{SessionError, SessionFactory};
use crate::ConfigError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while capturing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to load page: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability that captures a raw page for a certificate
///
/// Never fails from the caller's point of view.
#[async_trait]
pub trait DiagnosticSnapshot: Send + Sync {
    async fn snapshot(&self, id: &CertificateId, timeout: Duration);
}

/// Writes raw HTML snapshots into a debug directory
#[derive(Debug, Clone)]
pub struct HtmlSnapshotWriter {
    sessions: SessionFactory,
    debug_dir: PathBuf,
    settle: Duration,
}

impl HtmlSnapshotWriter {
    pub fn new(sessions: SessionFactory, debug_dir: impl Into<PathBuf>, settle: Duration) -> Self {
        Self {
            sessions,
            debug_dir: debug_dir.into(),
            settle,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            SessionFactory::from_config(&config.fetch)?,
            &config.output.debug_dir,
            config.fetch.snapshot_settle(),
        ))
    }

    pub fn debug_dir(&self) -> &Path {
        &self.debug_dir
    }

    /// Path the snapshot for `id` is written to
    pub fn snapshot_path(&self, id: &CertificateId) -> PathBuf {
        self.debug_dir.join(format!("{}.html", id.file_stem()))
    }

    /// Captures the page for `id`, returning the written path
    async fn capture(&self, id: &CertificateId, timeout: Duration) -> Result<PathBuf, SnapshotError> {
        tokio::fs::create_dir_all(&self.debug_dir).await?;
        let path = self.snapshot_path(id);

        let url = self.sessions.page_url(id)?;
        let session = self.sessions.open(timeout)?;
        let page = session.load(&url).await?;

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        tokio::fs::write(&path, page.body.as_bytes()).await?;
        Ok(path)
    }
}

#[async_trait]
impl DiagnosticSnapshot for HtmlSnapshotWriter {
    async fn snapshot(&self, id: &CertificateId, timeout: Duration) {
        match self.capture(id, timeout).await {
            Ok(path) => {
                tracing::info!(
                    "Saved debug snapshot for certificate {} to {}",
                    id,
                    path.display()
                );
            }
            Err(e) => {
                tracing::error!("Failed to save snapshot for certificate {}: {}", id, e);
            }
        }
    }
}
