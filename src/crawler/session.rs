//! Isolated page sessions
//!
//! Every fetch attempt and every diagnostic snapshot opens its own
//! `PageSession`: a dedicated HTTP client with no connection pool, cookies,
//! or other state shared with any other attempt. The session is released
//! when the guard is dropped, on every exit path.

use crate::config::FetchConfig;
use crate::certificate::CertificateId;
use crate::ConfigError;
use reqwest::{redirect::Policy, Client};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while loading a page through a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Request timed out for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Invalid page URL for certificate {id}: {reason}")]
    Url { id: String, reason: String },

    #[error("Failed to open session: {0}")]
    Client(#[from] reqwest::Error),
}

/// A loaded page: final status code and the raw document
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub status_code: u16,
    pub body: String,
}

impl LoadedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Opens isolated sessions against the certificate site
#[derive(Debug, Clone)]
pub struct SessionFactory {
    base_url: Url,
    user_agent: String,
    open_sessions: Arc<AtomicUsize>,
}

impl SessionFactory {
    /// Creates a factory for the given base URL
    ///
    /// Certificate IDs are appended to the base path; a missing trailing
    /// slash is implied.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", base_url, e)))?;

        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}' cannot hold a certificate path",
                base_url
            )));
        }

        Ok(Self {
            base_url: parsed,
            user_agent: user_agent.to_string(),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, &config.user_agent)
    }

    /// Returns the page URL for a certificate
    ///
    /// The ID is appended to the base path as one percent-encoded segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use cert_lookup::crawler::SessionFactory;
    /// use cert_lookup::CertificateId;
    ///
    /// let factory = SessionFactory::new("https://grading.example.com/cert", "test-agent").unwrap();
    /// let id = CertificateId::new("10042").unwrap();
    /// assert_eq!(
    ///     factory.page_url(&id).unwrap().as_str(),
    ///     "https://grading.example.com/cert/10042"
    /// );
    /// ```
    pub fn page_url(&self, id: &CertificateId) -> Result<Url, SessionError> {
        if id.is_dot_segment() {
            return Err(SessionError::Url {
                id: id.to_string(),
                reason: "a dot segment cannot address a page".to_string(),
            });
        }

        let mut url = self.base_url.clone();
        let mut path = url.path().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(&id.encoded());
        url.set_path(&path);
        Ok(url)
    }

    /// Opens a fresh session whose requests time out after `timeout`
    pub fn open(&self, timeout: Duration) -> Result<PageSession, SessionError> {
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::limited(10))
            .pool_max_idle_per_host(0)
            .gzip(true)
            .brotli(true)
            .build()?;

        let open = self.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("Opened page session ({} open)", open);

        Ok(PageSession {
            client,
            open_sessions: Arc::clone(&self.open_sessions),
        })
    }

    /// Number of sessions currently open
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

/// Scoped handle to one isolated session; released on drop
#[derive(Debug)]
pub struct PageSession {
    client: Client,
    open_sessions: Arc<AtomicUsize>,
}

impl PageSession {
    /// Navigates to `url` and returns the raw document
    ///
    /// Non-success status codes are not an error here; callers decide what a
    /// given status means for them.
    pub async fn load(&self, url: &Url) -> Result<LoadedPage, SessionError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(LoadedPage { status_code, body })
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        let remaining = self.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::trace!("Released page session ({} open)", remaining);
    }
}

/// Classifies a reqwest error into timeout or transport failure
fn classify_error(url: &Url, error: reqwest::Error) -> SessionError {
    if error.is_timeout() {
        SessionError::Timeout {
            url: url.to_string(),
        }
    } else {
        SessionError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
