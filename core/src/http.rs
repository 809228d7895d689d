//! Request types passed from the dispatcher to a transport.
//!
//! # Design
//! A redirect chain is a sequence of single exchanges. Each exchange is
//! described by a `HopRequest` as plain data, so the dispatcher decides what
//! the next hop looks like and the transport only performs I/O.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use url::Url;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the upper-case method name. Anything else is a construction error.
impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(Error::Construction(format!("unsupported method {other:?}"))),
        }
    }
}

/// Request body for one hop.
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    /// A stream is read once; it cannot be sent again on a later hop.
    Reader(Box<dyn Read + Send>),
}

impl Body {
    /// A copy that can be sent on a later hop, if the body is replayable.
    pub fn try_clone(&self) -> Option<Body> {
        match self {
            Body::Empty => Some(Body::Empty),
            Body::Bytes(bytes) => Some(Body::Bytes(bytes.clone())),
            Body::Reader(_) => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Body::Reader(_) => f.write_str("Reader"),
        }
    }
}

/// A single exchange in a redirect chain, described as plain data.
#[derive(Debug)]
pub struct HopRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Headers in the order they are appended; names may repeat.
    pub headers: Vec<(String, String)>,
    pub body: Body,
}
