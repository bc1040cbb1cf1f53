//! Request body content negotiation.
//!
//! # Responsibilities
//! - Reject bodies whose media type, charset or encoding is not allowed (415)
//!
//! # Design Decisions
//! - Requests without a body always pass
//! - Comparisons are ASCII case-insensitive
//! - A missing charset counts as `utf-8`

use std::sync::Arc;

use axum::body::HttpBody;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;

use crate::routing::Middleware;
use crate::Request;

const DEFAULT_CHARSET: &str = "utf-8";

/// Allow only bodies whose `Content-Type` media type is listed.
pub fn content_type<I, S>(allowed: I) -> Middleware
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    guard(allowed, |request, allowed| {
        let media_type = header_str(request, header::CONTENT_TYPE)
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        contains(allowed, media_type)
    })
}

/// Allow only bodies whose `Content-Type` charset is listed.
pub fn content_charset<I, S>(allowed: I) -> Middleware
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    guard(allowed, |request, allowed| {
        let charset = charset(header_str(request, header::CONTENT_TYPE))
            .unwrap_or(DEFAULT_CHARSET);
        contains(allowed, charset)
    })
}

/// Allow only bodies whose every `Content-Encoding` is listed.
pub fn content_encoding<I, S>(allowed: I) -> Middleware
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    guard(allowed, |request, allowed| {
        request
            .headers()
            .get_all(header::CONTENT_ENCODING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|encoding| !encoding.is_empty())
            .all(|encoding| contains(allowed, encoding))
    })
}

fn guard<I, S>(allowed: I, accepts: fn(&Request, &[String]) -> bool) -> Middleware
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Arc<[String]> = allowed.into_iter().map(Into::into).collect();

    Middleware::from_fn(move |request: Request, next: Next| {
        let allowed = allowed.clone();
        async move {
            if has_body(&request) && !accepts(&request, &allowed) {
                return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
            }
            next.run(request).await
        }
    })
}

fn has_body(request: &Request) -> bool {
    match request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
    {
        Some(length) => length > 0,
        None => request.body().size_hint().exact() != Some(0),
    }
}

fn header_str(request: &Request, name: header::HeaderName) -> &str {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn contains(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}
