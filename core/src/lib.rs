//! Strict HTTP requests: size caps, per-call timeouts and redirect control.
//!
//! # Overview
//! A thin layer over a ureq agent. Each call builds a request from a method,
//! a URL and [`Options`], then:
//! - adds `Range: bytes=0-N` when `max_size_mb` is set (advisory; the server
//!   decides whether to honour it),
//! - appends the caller's headers,
//! - bounds the whole call, redirects included, by `timeout_ms`,
//! - follows redirects only as far as the redirect flags allow.
//!
//! A refused redirect is not an error: the 3xx response comes back as-is.
//!
//! # Design
//! - `Client` is stateless apart from its transport; all per-call settings
//!   live in values built for that call, so concurrent calls never interfere.
//! - The transport performs one exchange per hop; the dispatcher owns the
//!   redirect walk and consults the policy between hops.
//! - URL equivalence is a small string normalizer (scheme, `www.`, one
//!   trailing slash) in [`equivalence`].

pub mod client;
pub mod equivalence;
pub mod error;
pub mod http;
pub mod options;
pub mod policy;
pub mod transport;

use ureq::http::Response;

pub use client::{Client, MAX_REDIRECTS};
pub use equivalence::{is_identical_url, is_same_url_different_scheme};
pub use error::{Error, Result};
pub use http::{Body, HopRequest, HttpMethod};
pub use options::Options;
pub use policy::{Redirect, RedirectPolicy};
pub use transport::{Transport, UreqTransport};

/// Dispatch by method name with a fresh default client.
pub fn request(method: &str, url: &str, options: Options) -> Result<Response<ureq::Body>> {
    Client::new().request(method, url, options)
}

pub fn get(url: &str, options: Options) -> Result<Response<ureq::Body>> {
    Client::new().get(url, options)
}

pub fn post(url: &str, options: Options) -> Result<Response<ureq::Body>> {
    Client::new().post(url, options)
}

pub fn put(url: &str, options: Options) -> Result<Response<ureq::Body>> {
    Client::new().put(url, options)
}

pub fn delete(url: &str, options: Options) -> Result<Response<ureq::Body>> {
    Client::new().delete(url, options)
}
