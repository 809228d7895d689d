//! Per-call request options.
//!
//! # Design
//! Everything except the streaming body is plain data and deserializes from
//! JSON with every field optional, so a caller can keep request policies in
//! configuration and attach a body at call time.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::http::Body;
use crate::policy::RedirectPolicy;

/// Options for one strict request. All knobs default to "off".
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Follow every redirect.
    pub allow_redirects: bool,
    /// Follow `http` → `https` redirects to an equivalent URL.
    pub allow_https_redirects: bool,
    /// Follow redirects to an equivalent URL regardless of scheme.
    pub allow_www_redirects: bool,
    /// Streaming body. Ignored when `body_bytes` is set.
    #[serde(skip)]
    pub body: Option<Box<dyn Read + Send>>,
    pub body_bytes: Option<Vec<u8>>,
    /// Extra headers, appended to the request.
    pub headers: HashMap<String, String>,
    /// Advisory response cap in megabytes (10^6 bytes). Ignored unless > 0.
    pub max_size_mb: f64,
    /// Timeout for the whole call in milliseconds. Ignored unless > 0.
    pub timeout_ms: u64,
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// `bytes=0-N` with `N = floor(max_size_mb * 1_000_000)`.
    pub fn range_header(&self) -> Option<String> {
        (self.max_size_mb > 0.0).then(|| {
            let last_byte = (self.max_size_mb * 1_000_000.0).floor() as u64;
            format!("bytes=0-{last_byte}")
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn redirect_policy(&self) -> RedirectPolicy {
        RedirectPolicy {
            allow_all: self.allow_redirects,
            allow_https_upgrade: self.allow_https_redirects,
            allow_equivalent: self.allow_www_redirects,
        }
    }

    /// Headers for the first hop: the range cap, then the caller's headers.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        if let Some(range) = self.range_header() {
            headers.push(("Range".to_string(), range));
        }
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    /// Byte payload wins over a stream; no body otherwise.
    pub fn take_body(&mut self) -> Body {
        match (self.body_bytes.take(), self.body.take()) {
            (Some(bytes), _) => Body::Bytes(bytes),
            (None, Some(reader)) => Body::Reader(reader),
            (None, None) => Body::Empty,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("allow_redirects", &self.allow_redirects)
            .field("allow_https_redirects", &self.allow_https_redirects)
            .field("allow_www_redirects", &self.allow_www_redirects)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .field("body_bytes", &self.body_bytes.as_ref().map(Vec::len))
            .field("headers", &self.headers)
            .field("max_size_mb", &self.max_size_mb)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn defaults_are_off() {
        let options = Options::default();
        assert!(options.range_header().is_none());
        assert!(options.timeout().is_none());
        assert_eq!(options.redirect_policy(), RedirectPolicy::default());
        assert!(options.request_headers().is_empty());
    }

    #[test]
    fn range_header_floors_megabytes() {
        let mut options = Options { max_size_mb: 1.5, ..Default::default() };
        assert_eq!(options.range_header().as_deref(), Some("bytes=0-1500000"));

        options.max_size_mb = 0.25;
        assert_eq!(options.range_header().as_deref(), Some("bytes=0-250000"));

        options.max_size_mb = 0.0000015;
        assert_eq!(options.range_header().as_deref(), Some("bytes=0-1"));
    }

    #[test]
    fn non_positive_size_is_ignored() {
        for max_size_mb in [0.0, -1.0, f64::NAN] {
            let options = Options { max_size_mb, ..Default::default() };
            assert!(options.range_header().is_none(), "{max_size_mb}");
        }
    }

    #[test]
    fn range_comes_before_custom_headers() {
        let options = Options {
            max_size_mb: 2.0,
            headers: HashMap::from([("X-Token".to_string(), "abc".to_string())]),
            ..Default::default()
        };
        assert_eq!(
            options.request_headers(),
            vec![
                ("Range".to_string(), "bytes=0-2000000".to_string()),
                ("X-Token".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn timeout_in_milliseconds() {
        let options = Options { timeout_ms: 100, ..Default::default() };
        assert_eq!(options.timeout(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn bytes_take_precedence_over_stream() {
        let mut options = Options {
            body: Some(Box::new(Cursor::new(b"stream".to_vec()))),
            body_bytes: Some(b"bytes".to_vec()),
            ..Default::default()
        };
        match options.take_body() {
            Body::Bytes(bytes) => assert_eq!(bytes, b"bytes"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stream_used_without_bytes() {
        let mut options = Options {
            body: Some(Box::new(Cursor::new(b"stream".to_vec()))),
            ..Default::default()
        };
        assert!(matches!(options.take_body(), Body::Reader(_)));
        assert!(matches!(options.take_body(), Body::Empty));
    }

    #[test]
    fn deserializes_partial_json() {
        let options = Options::from_json(
            r#"{"allow_https_redirects":true,"timeout_ms":250,"headers":{"Accept":"text/html"}}"#,
        )
        .unwrap();
        assert!(options.allow_https_redirects);
        assert!(!options.allow_redirects);
        assert_eq!(options.timeout_ms, 250);
        assert_eq!(options.headers["Accept"], "text/html");
        assert!(options.body.is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Options::from_json(r#"{"timeout_ms":"soon"}"#).unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }
}
