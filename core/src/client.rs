//! Strict request dispatcher.
//!
//! # Design
//! `Client` holds only a transport and carries no mutable state between
//! calls. Each call turns its `Options` into an immutable per-call setup
//! (first hop, redirect policy, deadline) and walks the redirect chain:
//! send one hop, ask the policy about the redirect, build the next hop.
//! A refused redirect ends the walk with the redirect response itself.

use std::time::{Duration, Instant};

use tracing::{debug, debug_span};
use ureq::http::header::LOCATION;
use ureq::http::Response;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::{Body, HopRequest, HttpMethod};
use crate::options::Options;
use crate::policy::{Redirect, RedirectPolicy};
use crate::transport::{Transport, UreqTransport};

/// Redirect responses after which the chain is abandoned.
pub const MAX_REDIRECTS: usize = 10;

/// Headers dropped once a redirect leaves the original host.
const CREDENTIAL_HEADERS: [&str; 4] = ["authorization", "www-authenticate", "cookie", "cookie2"];

/// Synchronous, stateless dispatcher over a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct Client<T = UreqTransport> {
    transport: T,
}

impl Client<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Dispatch by method name (`"GET"`, `"POST"`, `"PUT"`, `"DELETE"`).
    pub fn request(&self, method: &str, url: &str, options: Options) -> Result<Response<T::Body>> {
        self.send(method.parse()?, url, options)
    }

    pub fn get(&self, url: &str, options: Options) -> Result<Response<T::Body>> {
        self.send(HttpMethod::Get, url, options)
    }

    pub fn post(&self, url: &str, options: Options) -> Result<Response<T::Body>> {
        self.send(HttpMethod::Post, url, options)
    }

    pub fn put(&self, url: &str, options: Options) -> Result<Response<T::Body>> {
        self.send(HttpMethod::Put, url, options)
    }

    pub fn delete(&self, url: &str, options: Options) -> Result<Response<T::Body>> {
        self.send(HttpMethod::Delete, url, options)
    }

    /// Send `method url` under `options` and return the final response.
    ///
    /// A redirect the policy refuses is returned as a normal response with
    /// its 3xx status and `Location` header intact.
    pub fn send(&self, method: HttpMethod, url: &str, mut options: Options) -> Result<Response<T::Body>> {
        let span = debug_span!("strict_request", id = %Uuid::new_v4(), %method, url);
        let _guard = span.enter();

        let first = HopRequest {
            method,
            url: parse_url(url)?,
            headers: options.request_headers(),
            body: options.take_body(),
        };
        self.walk(url, first, options.redirect_policy(), options.timeout())
    }

    /// `original` is the URL as the caller wrote it; redirect candidates are
    /// compared against that text, explicit default ports included.
    fn walk(
        &self,
        original: &str,
        first: HopRequest,
        policy: RedirectPolicy,
        timeout: Option<Duration>,
    ) -> Result<Response<T::Body>> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut via: Vec<Url> = Vec::new();
        let mut request = first;

        loop {
            let budget = match (deadline, timeout) {
                (Some(deadline), Some(timeout)) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Err(Error::Timeout(timeout));
                    }
                    Some(left)
                }
                _ => None,
            };

            let method = request.method;
            let current = request.url.clone();
            let headers = request.headers.clone();
            let replay = request.body.try_clone();

            debug!(hop = via.len(), %method, url = %current, "sending");
            let response = self.transport.execute(request, budget).map_err(|err| match (err, timeout) {
                (Error::Timeout(_), Some(timeout)) => Error::Timeout(timeout),
                (err, _) => err,
            })?;

            let status = response.status().as_u16();
            if !is_redirect(status) || policy.follows_none() {
                return Ok(response);
            }
            let Some(candidate) = location(&response, &current)? else {
                debug!(status, "redirect without location");
                return Ok(response);
            };

            via.push(current);
            if policy.check(original, &candidate, &via) == Redirect::Stop {
                return Ok(response);
            }
            if via.len() >= MAX_REDIRECTS {
                return Err(Error::TooManyRedirects(via.len()));
            }
            let Some((method, body)) = follow_up(status, method, replay) else {
                debug!(status, "stream body cannot be replayed");
                return Ok(response);
            };

            let headers = if shares_credentials(&via[0], &candidate) {
                headers
            } else {
                without_credentials(headers)
            };
            request = HopRequest { method, url: candidate, headers, body };
        }
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::Construction(format!("{url:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::Construction(format!("unsupported protocol scheme {scheme:?}"))),
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolve the `Location` header against the URL that produced it.
///
/// A missing or empty header means there is nowhere to go.
fn location<B>(response: &Response<B>, current: &Url) -> Result<Option<Url>> {
    let Some(value) = response.headers().get(LOCATION).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let invalid = |reason: String| Error::InvalidLocation {
        location: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        reason,
    };
    let location = std::str::from_utf8(value.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    current.join(location).map(Some).map_err(|e| invalid(e.to_string()))
}

/// Method and body for the hop after a redirect with `status`.
///
/// 301/302/303 switch to a bodiless GET. 307/308 repeat the request, which
/// needs a replayable body.
fn follow_up(status: u16, method: HttpMethod, replay: Option<Body>) -> Option<(HttpMethod, Body)> {
    match status {
        307 | 308 => replay.map(|body| (method, body)),
        _ => Some((HttpMethod::Get, Body::Empty)),
    }
}

/// Credentials may go to the original host and its subdomains.
fn shares_credentials(original: &Url, candidate: &Url) -> bool {
    match (original.host_str(), candidate.host_str()) {
        (Some(original), Some(candidate)) => {
            candidate == original
                || candidate
                    .strip_suffix(original)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        _ => false,
    }
}

fn without_credentials(headers: Vec<(String, String)>) -> Vec<(String, String)> {
    headers
        .into_iter()
        .filter(|(name, _)| !CREDENTIAL_HEADERS.iter().any(|c| name.eq_ignore_ascii_case(c)))
        .collect()
}
