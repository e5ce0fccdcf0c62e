//! Remote call error types

use thiserror::Error;

/// Error from a remote call, normalized at the call boundary.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Timeout, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Unknown, message)
    }

    /// Classify a non-2xx response, preferring a human-readable `detail` or
    /// `message` field from the body over a bare status line.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message =
            extract_detail(body).unwrap_or_else(|| format!("HTTP {status}"));
        let kind = match status {
            400..=499 => RemoteErrorKind::Client,
            500..=599 => RemoteErrorKind::Server,
            _ => RemoteErrorKind::Unknown,
        };
        Self::new(kind, message)
    }
}

/// Failure classification, used for logging only. Nothing retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Connection-level failure
    Network,
    /// The fixed per-call timeout elapsed
    Timeout,
    /// 4xx response
    Client,
    /// 5xx response
    Server,
    /// 2xx response with a body that doesn't parse or validate
    Malformed,
    /// Anything else
    Unknown,
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"].iter().find_map(|field| {
        value
            .get(field)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    })
}
