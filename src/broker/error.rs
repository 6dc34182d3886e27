//! Broker API errors
//!
//! Every failure a fetch can run into is one of these variants. None of them
//! is fatal; callers decide what to do with them.

use std::time::Duration;

use reqwest::StatusCode;

/// Class of a [`FetchError`], for callers that only care about the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    Decode,
    Deadline,
    Task,
    Config,
}

/// Error returned by the resource fetcher, the accessors and the aggregator
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection refused, TLS handshake failure, request timeout...
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The broker answered with anything but the expected status.
    ///
    /// Displays the code with its canonical reason ("503 Service
    /// Unavailable"); codes without one show the bare number. The reason
    /// phrase sent on the wire is not available through reqwest.
    #[error("{url}: {}", status_text(.status))]
    Status { url: String, status: StatusCode },

    /// Body is not JSON or does not match the expected shape
    #[error("{url}: failed to decode response: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot not complete after {0:?}")]
    DeadlineExceeded(Duration),

    /// A fetch task panicked or was cancelled before reporting back
    #[error("fetch task failed: {0}")]
    Task(String),

    #[error("invalid API URI: {0}")]
    InvalidUri(String),

    /// Unusable TLS or client settings
    #[error("configuration error: {0}")]
    Config(String),
}

/// Code and reason of `status`, e.g. "404 Not Found" or just "599"
pub fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Status,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::DeadlineExceeded(_) => ErrorKind::Deadline,
            Self::Task(_) => ErrorKind::Task,
            Self::InvalidUri(_) | Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status of a protocol error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for FetchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Format a broker error for display
pub fn format_broker_error(error: &FetchError) -> String {
    match error {
        FetchError::Transport(e) if e.is_timeout() => {
            "Request timed out. Is the management plugin reachable?".to_string()
        }
        FetchError::Transport(e) if e.is_connect() => {
            "Could not connect to the management API. Check the API URI.".to_string()
        }
        FetchError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        FetchError::Status { status, .. } => match status.as_u16() {
            401 => "Authentication failed. Check the credentials in the API URI.".to_string(),
            403 => "Permission denied. The user needs the 'monitoring' tag.".to_string(),
            404 => format!("Resource not found ({status})."),
            _ => format!("Broker returned {}.", status_text(status)),
        },
        FetchError::Decode { url, .. } => {
            format!("Unexpected response from {url}. Is this a RabbitMQ management API?")
        }
        other => other.to_string(),
    }
}
