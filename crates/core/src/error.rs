//! Error types for the CueMap client.
//!
//! Uses `thiserror` for ergonomic error definitions. Every failure a caller
//! can observe is one [`ClientError`], distinguished by [`ErrorKind`].

use std::time::Duration;
use thiserror::Error;

/// Boxed underlying cause carried by transport faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error type surfaced by every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The engine answered 401.
    #[error("Authentication failed: invalid or missing API key")]
    Authentication,

    /// The engine answered any other non-success status.
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16, body: String },

    /// Connection, encoding, decoding, or abort fault below the HTTP status.
    #[error("Transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The per-call deadline elapsed before the engine responded.
    #[error("Request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

/// Discriminant of a [`ClientError`], for callers that branch on cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    RequestFailed,
    Transport,
    Timeout,
}

impl ClientError {
    /// Wrap an underlying fault as a transport failure.
    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A transport failure with no underlying error value.
    pub fn transport_msg(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication => ErrorKind::Authentication,
            Self::RequestFailed { .. } => ErrorKind::RequestFailed,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// HTTP status attached to the error, if the engine answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication => Some(401),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn request_failed_displays_status() {
        let err = ClientError::RequestFailed {
            status: 500,
            body: r#"{"error":"boom"}"#.into(),
        };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn authentication_has_fixed_message() {
        let err = ClientError::Authentication;
        assert_eq!(
            err.to_string(),
            "Authentication failed: invalid or missing API key"
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn transport_keeps_underlying_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::transport("connect failed", cause);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.status().is_none());
        let source = err.source().expect("source should be kept");
        assert!(source.to_string().contains("refused"));
    }

    #[test]
    fn timeout_reports_duration() {
        let err = ClientError::Timeout {
            after: Duration::from_millis(5),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("5ms"));
    }
}
