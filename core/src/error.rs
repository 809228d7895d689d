//! Error types for strict requests.
//!
//! # Design
//! `Timeout` gets a dedicated variant because callers frequently want to
//! special-case "the server was too slow" apart from other transport
//! failures. A redirect that the policy refuses to follow is *not* an error:
//! the redirect response itself is returned and the caller inspects its
//! status.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the dispatcher.
#[derive(Debug, Error)]
pub enum Error {
    /// The method, URL or a header could not form a valid request.
    #[error("invalid request: {0}")]
    Construction(String),

    /// The transport failed (connection refused, DNS, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured timeout elapsed before a response arrived.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A redirect carried a `Location` that does not resolve to a URL.
    #[error("invalid redirect location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    /// The redirect chain grew past the hop limit.
    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),

    /// Options could not be deserialized.
    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinguishable_from_transport() {
        assert!(Error::Timeout(Duration::from_millis(100)).is_timeout());
        assert!(!Error::Transport("connection refused".into()).is_timeout());
    }

    #[test]
    fn transport_keeps_source() {
        let err = Error::Transport("connection refused".into());
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection refused");
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::Construction("relative URL without a base".to_string()).to_string(),
            "invalid request: relative URL without a base"
        );
        assert_eq!(Error::TooManyRedirects(10).to_string(), "stopped after 10 redirects");
    }
}
