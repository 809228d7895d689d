//! The HTTP client collaborator.
//!
//! # Design
//! A `Transport` performs exactly one exchange and never follows redirects on
//! its own; the dispatcher owns the redirect walk so the policy can run
//! between hops. The timeout passed in is the budget left for this hop.

use std::io;
use std::time::Duration;

use tracing::debug;
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder, SendBody};

use crate::error::{Error, Result};
use crate::http::{Body, HopRequest, HttpMethod};

/// Performs a single HTTP exchange.
pub trait Transport {
    /// Response body type handed back to the caller untouched.
    type Body;

    /// Send `request` and return whatever response arrives, redirects included.
    ///
    /// Elapsed timeouts must be reported as [`Error::Timeout`].
    fn execute(&self, request: HopRequest, timeout: Option<Duration>) -> Result<Response<Self::Body>>;
}

/// Production transport backed by a ureq `Agent`.
///
/// The agent never follows redirects and returns 4xx/5xx responses as data,
/// so every status reaches the dispatcher.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    type Body = ureq::Body;

    fn execute(&self, request: HopRequest, timeout: Option<Duration>) -> Result<Response<ureq::Body>> {
        let HopRequest { method, url, headers, body } = request;
        let url = url.as_str();
        debug!(%method, url, ?body, ?timeout, "ureq exchange");

        let result = match (method, body) {
            (HttpMethod::Get, Body::Empty) => prepare(self.agent.get(url), &headers, timeout).call(),
            (HttpMethod::Delete, Body::Empty) => {
                prepare(self.agent.delete(url), &headers, timeout).call()
            }
            (HttpMethod::Get, body) => {
                send(prepare(self.agent.get(url).force_send_body(), &headers, timeout), body)
            }
            (HttpMethod::Delete, body) => {
                send(prepare(self.agent.delete(url).force_send_body(), &headers, timeout), body)
            }
            (HttpMethod::Post, body) => send(prepare(self.agent.post(url), &headers, timeout), body),
            (HttpMethod::Put, body) => send(prepare(self.agent.put(url), &headers, timeout), body),
        };

        result.map_err(|err| classify(err, timeout))
    }
}

/// Append headers and set the per-hop timeout.
fn prepare<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
    timeout: Option<Duration>,
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.config().timeout_global(timeout).build()
}

fn send(builder: RequestBuilder<WithBody>, body: Body) -> Result<Response<ureq::Body>, ureq::Error> {
    match body {
        Body::Empty => builder.send_empty(),
        Body::Bytes(bytes) => builder.send(&bytes[..]),
        Body::Reader(mut reader) => builder.send(SendBody::from_reader(&mut reader)),
    }
}

/// Map ureq failures onto the crate taxonomy.
fn classify(err: ureq::Error, timeout: Option<Duration>) -> Error {
    match err {
        ureq::Error::Timeout(_) => Error::Timeout(timeout.unwrap_or_default()),
        ureq::Error::Io(io) if io.kind() == io::ErrorKind::TimedOut => {
            Error::Timeout(timeout.unwrap_or_default())
        }
        ureq::Error::Http(http) => Error::Construction(http.to_string()),
        ureq::Error::BadUri(uri) => Error::Construction(uri),
        other => Error::Transport(Box::new(other)),
    }
}
