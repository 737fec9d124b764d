//! Typed errors for the discovery library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep the
//! failure taxonomy explicit: per-item fetch problems degrade the item,
//! search and storage problems abort the run.

use thiserror::Error;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Search source transport or API failure. Fatal for the whole
    /// discovery run; the next scheduled activation self-heals.
    #[error("search failed: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed. No partial writes are attempted.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Notification sink failure. Callers treat delivery as
    /// fire-and-forget, so this usually only gets logged.
    #[error("notify error: {0}")]
    Notify(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from a single outbound page fetch.
///
/// These never abort a batch: the extractor maps them to "no schema"
/// and the sweep maps them to "skip".
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failure (connect, TLS, read).
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The bounded per-request timeout elapsed.
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// Wrap a reqwest error, preserving the timeout distinction.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http(Box::new(err))
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for single-page fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
