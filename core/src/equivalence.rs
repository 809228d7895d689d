//! Relaxed URL equivalence used by the redirect policy.
//!
//! # Design
//! Two URLs are treated as the same resource when they only differ by:
//! - their scheme (`http://` vs `https://`),
//! - a `www.` label directly after the scheme,
//! - a single trailing `/`.
//!
//! Normalization works on the raw strings in three ordered passes. The
//! scheme is replaced by a bare `://` marker so the `www.` pass can anchor on
//! it; a host without a scheme therefore keeps its `www.` label. Nothing else
//! is elided, so `example..com` never matches `example.com`.

const SCHEME_SEPARATOR: &str = "://";
const WWW_AFTER_SEPARATOR: &str = "://www.";

/// Returns `true` if `a` and `b` point at the same resource once scheme,
/// leading `www.` and one trailing slash are ignored.
///
/// Total: malformed input is simply compared as normalized text.
pub fn is_identical_url(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Returns `true` if both URLs carry a scheme, the schemes differ, and the
/// URLs are otherwise identical in the sense of [`is_identical_url`].
pub fn is_same_url_different_scheme(a: &str, b: &str) -> bool {
    match (split_scheme(a), split_scheme(b)) {
        (Some((scheme_a, _)), Some((scheme_b, _))) => {
            !scheme_a.eq_ignore_ascii_case(scheme_b) && is_identical_url(a, b)
        }
        _ => false,
    }
}

fn normalize(url: &str) -> String {
    let mut normalized = match split_scheme(url) {
        Some((_, rest)) => format!("{SCHEME_SEPARATOR}{rest}"),
        None => url.to_owned(),
    };

    if let Some(host) = normalized.strip_prefix(WWW_AFTER_SEPARATOR) {
        normalized = format!("{SCHEME_SEPARATOR}{host}");
    }

    if normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Split `scheme://rest` where the scheme is one or more ASCII word
/// characters (`[A-Za-z0-9_]`).
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once(SCHEME_SEPARATOR)?;
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    if scheme.is_empty() || !scheme.bytes().all(is_word) {
        return None;
    }
    Some((scheme, rest))
}
