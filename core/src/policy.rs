//! Per-hop redirect decisions.
//!
//! # Design
//! The policy is consulted once per redirect response, before the next hop
//! is sent. It always compares the candidate against the first URL of the
//! chain, never the hop that produced the redirect, so allowing hop 1 does
//! not widen what hop 2 may do.

use tracing::debug;
use url::Url;

use crate::equivalence::is_identical_url;

/// What to do with a redirect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Follow,
    /// Return the redirect response to the caller as-is.
    Stop,
}

/// Which redirects may be followed. The default follows none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectPolicy {
    pub allow_all: bool,
    /// `http` → `https` onto an equivalent URL.
    pub allow_https_upgrade: bool,
    /// Any scheme onto an equivalent URL (`www.` prefix, trailing slash).
    pub allow_equivalent: bool,
}

impl RedirectPolicy {
    /// True when no redirect can ever be followed.
    pub fn follows_none(&self) -> bool {
        !(self.allow_all || self.allow_https_upgrade || self.allow_equivalent)
    }

    /// Decide whether to follow a redirect to `candidate`.
    ///
    /// `original` is the first URL of the chain as the caller wrote it; `via`
    /// holds the URLs already requested in this chain, oldest first.
    pub fn check(&self, original: &str, candidate: &Url, via: &[Url]) -> Redirect {
        if self.allow_all {
            return Redirect::Follow;
        }
        let Some(first) = via.first() else {
            return Redirect::Stop;
        };

        let equivalent = is_identical_url(candidate.as_str(), original);
        let upgrade = first.scheme() == "http" && candidate.scheme() == "https";

        let decision = if self.allow_https_upgrade && upgrade && equivalent {
            Redirect::Follow
        } else if self.allow_equivalent && equivalent {
            Redirect::Follow
        } else {
            Redirect::Stop
        };
        debug!(hop = via.len(), %candidate, %original, ?decision, "redirect policy");
        decision
    }
}
