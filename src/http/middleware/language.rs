//! Language negotiation.
//!
//! # Design Decisions
//! - `Accept-Language` entries are tried by descending q-value, header order breaking ties
//! - An entry matches a supported tag exactly, else by primary subtag (`fr-CA` → `fr`)
//! - No match falls back to the first supported tag

use std::sync::Arc;

use axum::http::header;
use axum::middleware::Next;

use crate::http::context::Language;
use crate::routing::Middleware;
use crate::Request;

const FALLBACK_LANGUAGE: &str = "en";
const MAX_TAG_LEN: usize = 35;

/// Negotiate the request language against `supported`.
pub fn language<I, S>(supported: I) -> Middleware
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let supported: Arc<[String]> = supported.into_iter().map(Into::into).collect();

    Middleware::from_fn(move |mut request: Request, next: Next| {
        let supported = supported.clone();
        async move {
            let accept = request
                .headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            let lang = negotiate(accept, &supported);

            request.extensions_mut().insert(Language(lang));
            next.run(request).await
        }
    })
}

/// Let the `cookie` cookie override the negotiated language.
///
/// Empty or malformed cookie values are ignored.
pub fn override_language(cookie: &str) -> Middleware {
    let cookie: Arc<str> = cookie.into();

    Middleware::from_fn(move |mut request: Request, next: Next| {
        let cookie = cookie.clone();
        async move {
            if let Some(tag) = cookie_value(&request, &cookie).filter(|tag| is_tag(tag)) {
                let tag = tag.to_string();
                request.extensions_mut().insert(Language(tag));
            }
            next.run(request).await
        }
    })
}

fn negotiate(accept: &str, supported: &[String]) -> String {
    let mut ranges: Vec<(&str, f32)> = accept
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            let quality = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;
            (!tag.is_empty() && tag != "*" && quality > 0.0).then_some((tag, quality))
        })
        .collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    let primary = |tag: &str| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase();

    ranges
        .iter()
        .find_map(|&(tag, _)| {
            supported
                .iter()
                .find(|s| s.eq_ignore_ascii_case(tag))
                .or_else(|| {
                    supported
                        .iter()
                        .find(|s| primary(s.as_str()) == primary(tag))
                })
        })
        .or_else(|| supported.first())
        .cloned()
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

fn cookie_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

fn is_tag(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_TAG_LEN
        && value
            .split('-')
            .all(|part| {
                !part.is_empty()
                    && part.len() <= 8
                    && part.chars().all(|c| c.is_ascii_alphanumeric())
            })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::context;
    use crate::routing::Handler;
    use axum::body::Body;

    fn echo_language() -> Handler {
        Handler::from_fn(|req: Request| async move {
            context::language(&req).unwrap_or("none").to_string()
        })
    }

    async fn body_of(handler: &Handler, request: Request) -> String {
        let response = handler.serve(request).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[test]
    fn test_negotiate() {
        let supported = ["en".to_string(), "es".to_string(), "fr".to_string()];

        assert_eq!(negotiate("es", &supported), "es");
        assert_eq!(negotiate("fr;q=0.9,en;q=0.5", &supported), "fr");
        assert_eq!(negotiate("en;q=0.2, fr-CA;q=0.8", &supported), "fr");
        assert_eq!(negotiate("de", &supported), "en");
        assert_eq!(negotiate("", &supported), "en");
        assert_eq!(negotiate("es;q=0, fr", &supported), "fr");
        assert_eq!(negotiate("fr", &[]), FALLBACK_LANGUAGE);
    }

    #[tokio::test]
    async fn test_language_middleware() {
        let handler = language(["en", "es", "fr"]).wrap(echo_language());
        let request = axum::http::Request::builder()
            .header("Accept-Language", "es-MX,es;q=0.9")
            .body(Body::empty())
            .unwrap();

        assert_eq!(body_of(&handler, request).await, "es");
    }

    #[tokio::test]
    async fn test_override_language() {
        let handler = language(["en", "fr"])
            .wrap(override_language("lang").wrap(echo_language()));

        let request = axum::http::Request::builder()
            .header("Accept-Language", "fr")
            .header("Cookie", "theme=dark; lang=de")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body_of(&handler, request).await, "de");

        let empty = axum::http::Request::builder()
            .header("Accept-Language", "fr")
            .header("Cookie", "lang=")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body_of(&handler, empty).await, "fr");

        let malformed = axum::http::Request::builder()
            .header("Cookie", "lang=<script>")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body_of(&handler, malformed).await, "en");
    }
}
