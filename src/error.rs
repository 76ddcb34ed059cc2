//! Error handling

use thiserror::Error;

pub type MonitorResult<T> = Result<T, MonitorError>;

/// Failure taxonomy for console operations.
///
/// `Network`/`Http` cover requests that never completed or came back non-2xx
/// without a readable body; `Backend` is the backend's standardized
/// `{error, status}` envelope; `InvalidInput` is a user-side mistake caught
/// before any request is issued. Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}")]
    Http { status: u16 },

    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("a detection run is already in progress")]
    DetectionBusy,
}
