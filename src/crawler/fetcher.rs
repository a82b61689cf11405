//! Page fetcher implementation
//!
//! This module defines the `PageFetcher` capability consumed by the item
//! worker, and the HTTP implementation used in production:
//! - Opening an isolated session per attempt
//! - Loading the certificate page
//! - Letting the page settle before extraction
//! - Classifying every failure into a `FailureKind`

use crate::certificate::CertificateId;
use crate::config::FetchConfig;
use crate::crawler::parser::extract_card_fields;
use crate::crawler::session::{SessionError, SessionFactory};
use crate::ConfigError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Classification of a failed fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Required content did not arrive within the timeout
    Timeout,

    /// The page loaded but the required elements were absent
    ExtractionError,

    /// Any other failure (connection, TLS, unexpected status, ...)
    TransportError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ExtractionError => "extraction_error",
            Self::TransportError => "transport_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Both fields were extracted
    Success { card_name: String, grade: String },

    /// The attempt failed
    Failure { kind: FailureKind },
}

impl FetchOutcome {
    pub fn success(card_name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self::Success {
            card_name: card_name.into(),
            grade: grade.into(),
        }
    }

    pub fn failure(kind: FailureKind) -> Self {
        Self::Failure { kind }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Capability that looks up one certificate page
///
/// Implementations must never panic or return early without releasing the
/// resources they acquired; every failure is reported as
/// `FetchOutcome::Failure`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page for `id` and extracts its fields
    async fn fetch(&self, id: &CertificateId, timeout: Duration) -> FetchOutcome;
}

/// Fetches certificate pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    sessions: SessionFactory,
    settle: Duration,
}

impl HttpPageFetcher {
    pub fn new(sessions: SessionFactory, settle: Duration) -> Self {
        Self { sessions, settle }
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(SessionFactory::from_config(config)?, config.settle()))
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.sessions
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, id: &CertificateId, timeout: Duration) -> FetchOutcome {
        let url = match self.sessions.page_url(id) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Error fetching certificate {}: {}", id, e);
                return FetchOutcome::failure(FailureKind::TransportError);
            }
        };

        let session = match self.sessions.open(timeout) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Error fetching certificate {}: {}", id, e);
                return FetchOutcome::failure(FailureKind::TransportError);
            }
        };

        tracing::debug!("Fetching certificate {} from {}", id, url);
        let page = match session.load(&url).await {
            Ok(page) => page,
            Err(e) => return FetchOutcome::failure(classify_session_error(&e)),
        };

        if !page.is_success() {
            tracing::debug!(
                "Certificate {} page returned HTTP {}",
                id,
                page.status_code
            );
            return FetchOutcome::failure(FailureKind::TransportError);
        }

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        match extract_card_fields(&page.body) {
            Ok(fields) => {
                tracing::debug!(
                    "Fetched certificate {}: {} - {}",
                    id,
                    fields.card_name,
                    fields.grade
                );
                FetchOutcome::success(fields.card_name, fields.grade)
            }
            Err(e) => {
                tracing::debug!("Extraction failed for certificate {}: {}", id, e);
                FetchOutcome::failure(FailureKind::ExtractionError)
            }
        }
    }
}

/// Maps a session error onto the failure taxonomy
fn classify_session_error(error: &SessionError) -> FailureKind {
    match error {
        SessionError::Timeout { .. } => FailureKind::Timeout,
        SessionError::Transport { .. } | SessionError::Url { .. } | SessionError::Client(_) => {
            FailureKind::TransportError
        }
    }
}
