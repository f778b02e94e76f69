//! Error types for SSE decoding

use thiserror::Error;

/// Boxed error produced by the underlying byte source
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for SSE operations
pub type Result<T> = std::result::Result<T, SseError>;

/// Errors that can occur while consuming an SSE stream
///
/// Malformed payloads and unrecognized lines are not errors: payloads that
/// are not JSON are delivered as text, and unknown lines are skipped.
#[derive(Error, Debug)]
pub enum SseError {
    /// The source has no readable body
    #[error("Stream unavailable: response has no readable body")]
    StreamUnavailable,

    /// Reading the next chunk from the source failed
    #[error("Stream read failed: {0}")]
    Stream(#[source] BoxError),
}

impl SseError {
    /// Wrap any source error as a stream read failure
    pub fn stream(err: impl Into<BoxError>) -> Self {
        Self::Stream(err.into())
    }
}

impl From<reqwest::Error> for SseError {
    fn from(err: reqwest::Error) -> Self {
        Self::stream(err)
    }
}

impl From<std::io::Error> for SseError {
    fn from(err: std::io::Error) -> Self {
        Self::stream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_becomes_stream_error() {
        let err: SseError = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into();
        assert!(matches!(err, SseError::Stream(_)));
        assert_eq!(err.to_string(), "Stream read failed: reset");
    }

    #[test]
    fn test_stream_error_keeps_source() {
        use std::error::Error as _;

        let err = SseError::stream("aborted");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("aborted"));
    }
}
