//! Error types for the Voxbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Input/output channels and knowledge sources each have their own enum;
//! both are absorbed at the point of failure by the fallback chains, so only
//! the top-level `Error` ever reaches `main`.

use std::time::Duration;
use thiserror::Error;

/// The top-level error type for all Voxbot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    // --- Knowledge source errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of an input or output channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The device or engine behind the channel is missing for this session.
    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    /// Audio was captured but no words could be recognized.
    #[error("Speech not recognized")]
    Unrecognized,

    /// The recognition or synthesis service reported a failure.
    #[error("Service error on {channel}: {reason}")]
    Service { channel: String, reason: String },

    #[error("Channel {channel} timed out after {timeout_secs}s")]
    Timeout { channel: String, timeout_secs: u64 },

    /// The operator closed the input stream (EOF).
    #[error("Input closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(String),
}

impl ChannelError {
    /// Whether the channel should be considered gone for the rest of the session.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Failures of a knowledge source query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Source {source_name} timed out after {}ms", .timeout.as_millis())]
    Timeout { source_name: String, timeout: Duration },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_displays_correctly() {
        let err = Error::Source(SourceError::Status {
            status_code: 503,
            message: "Service Unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn timeout_reports_milliseconds() {
        let err = SourceError::Timeout {
            source_name: "wikipedia".into(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "Source wikipedia timed out after 1500ms");
    }

    #[test]
    fn only_unavailable_is_permanent() {
        assert!(ChannelError::Unavailable("no microphone".into()).is_unavailable());
        assert!(!ChannelError::Unrecognized.is_unavailable());
        assert!(!ChannelError::Closed.is_unavailable());
    }
}
