//! Local HTTP fixture for exercising strict requests.
//!
//! Routes:
//! - `GET /` → `ok\n`
//! - `ANY /echo` → the received method, headers and body as JSON
//! - `GET /sleep/{ms}` → `ok\n` after a delay
//! - `ANY /redirect?to=<url>&status=<code>` → redirect (301 by default)
//! - `GET /slash` → 301 to `/slash/`, which answers `ok\n`
//! - `GET /bytes/{n}` → `n` bytes of `abc…z` repeated, honouring `Range`

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` saw.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    /// In arrival order; repeated names appear once per value.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// All values sent for `name` (case-insensitive).
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Deserialize)]
pub struct RedirectParams {
    pub to: String,
    pub status: Option<u16>,
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(ok))
        .route("/echo", any(echo))
        .route("/sleep/{ms}", get(sleep))
        .route("/redirect", any(redirect))
        .route("/slash", get(|| async { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/slash/")]) }))
        .route("/slash/", get(ok))
        .route("/bytes/{n}", get(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> &'static str {
    "ok\n"
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn sleep(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "ok\n"
}

async fn redirect(Query(params): Query<RedirectParams>) -> Result<Response, StatusCode> {
    let status = StatusCode::from_u16(params.status.unwrap_or(301)).map_err(|_| StatusCode::BAD_REQUEST)?;
    if !status.is_redirection() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok((status, [(header::LOCATION, params.to)]).into_response())
}

async fn bytes(Path(n): Path<usize>, headers: HeaderMap) -> Response {
    let body = alphabet(n);
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_range(v, n));

    match range {
        Some((start, end)) => (
            StatusCode::PARTIAL_CONTENT,
            [(header::CONTENT_RANGE, format!("bytes {start}-{end}/{n}"))],
            body[start..=end].to_vec(),
        )
            .into_response(),
        None => (StatusCode::OK, body).into_response(),
    }
}

/// `n` bytes cycling through the lowercase alphabet.
pub fn alphabet(n: usize) -> Vec<u8> {
    (0..n).map(|i| b'a' + (i % 26) as u8).collect()
}

/// Parse `bytes=a-b` against a body of `len` bytes, clamping `b`.
fn parse_range(value: &str, len: usize) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let start: usize = start.trim().parse().ok()?;
    let end: usize = end.trim().parse().ok()?;
    if start > end || start >= len {
        return None;
    }
    Some((start, end.min(len - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_wraps() {
        assert_eq!(alphabet(3), b"abc");
        assert_eq!(alphabet(28)[26..], *b"ab");
        assert!(alphabet(0).is_empty());
    }

    #[test]
    fn parse_range_clamps_end() {
        assert_eq!(parse_range("bytes=0-4", 10), Some((0, 4)));
        assert_eq!(parse_range("bytes=0-1000000", 10), Some((0, 9)));
        assert_eq!(parse_range("bytes=3-3", 10), Some((3, 3)));
    }

    #[test]
    fn parse_range_rejects_unsatisfiable() {
        assert_eq!(parse_range("bytes=10-20", 10), None);
        assert_eq!(parse_range("bytes=5-2", 10), None);
        assert_eq!(parse_range("bytes=-5", 10), None);
        assert_eq!(parse_range("items=0-5", 10), None);
        assert_eq!(parse_range("bytes=0-1", 0), None);
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let echo = Echo {
            method: "POST".to_string(),
            headers: vec![("range".to_string(), "bytes=0-1".to_string())],
            body: "hello".to_string(),
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: Echo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.method, "POST");
        assert_eq!(back.header_values("Range"), vec!["bytes=0-1"]);
        assert_eq!(back.body, "hello");
    }

    #[test]
    fn redirect_params_status_optional() {
        let params: RedirectParams = serde_json::from_str(r#"{"to":"http://example.com"}"#).unwrap();
        assert_eq!(params.to, "http://example.com");
        assert!(params.status.is_none());
    }
}
