//! Where catalog sheets come from
//!
//! A [`TabularSource`] yields the raw CSV text of one sheet. Parsing into
//! snapshots happens in the store, so any transport can be plugged in.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::RefreshError;

const USER_AGENT: &str = concat!("xpledger/", env!("CARGO_PKG_VERSION"));

/// Default timeout for a single sheet download
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Short description for logs (URL or path)
    fn describe(&self) -> String;

    /// Fetch the complete sheet as CSV text
    async fn fetch(&self) -> Result<String, RefreshError>;
}

/// Build a source from a configured location.
///
/// `http://` and `https://` locations are downloaded, anything else is read
/// from disk (an optional `file://` prefix is stripped).
pub fn source_for(location: &str) -> Arc<dyn TabularSource> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Arc::new(FileSource::new(path))
    }
}

/// Published spreadsheet export fetched over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[async_trait]
impl TabularSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, RefreshError> {
        let url = self.url.clone();
        let timeout = self.timeout;
        // ureq blocks; dropping this future abandons the download without waiting for it
        tokio::task::spawn_blocking(move || fetch_blocking(&url, timeout)).await?
    }
}

fn fetch_blocking(url: &str, timeout: Duration) -> Result<String, RefreshError> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .set("Accept", "text/csv")
        .timeout(timeout)
        .call()
        .map_err(|e| RefreshError::Fetch {
            origin: url.to_string(),
            message: e.to_string(),
        })?;

    response.into_string().map_err(|e| RefreshError::Fetch {
        origin: url.to_string(),
        message: format!("Failed to read response: {}", e),
    })
}

/// Sheet exported to a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TabularSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, RefreshError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| RefreshError::Io {
                path: self.path.clone(),
                error,
            })
    }
}

/// In-memory sheet whose contents can be swapped at runtime.
///
/// Useful for embedding and for exercising refresh behaviour in tests.
#[derive(Debug, Default)]
pub struct StaticSource {
    body: Mutex<Option<String>>,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Mutex::new(Some(body.into())),
        }
    }

    /// A source whose fetches fail until [`StaticSource::set`] is called
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, body: impl Into<String>) {
        *self.body.lock().unwrap_or_else(|e| e.into_inner()) = Some(body.into());
    }

    /// Make subsequent fetches fail
    pub fn fail(&self) {
        *self.body.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl TabularSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<String, RefreshError> {
        self.body
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| RefreshError::Fetch {
                origin: self.describe(),
                message: "source unavailable".to_string(),
            })
    }
}
