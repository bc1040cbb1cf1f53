//! Mount prefix stripping.

use std::sync::Arc;

use axum::http::uri::PathAndQuery;
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::IntoResponse;

use crate::routing::Middleware;
use crate::{Request, Response};

/// Remove the literal `prefix` from the request path before calling downstream.
///
/// Requests whose path does not start with `prefix` get a 404. The query is kept.
pub fn strip_prefix(prefix: &str) -> Middleware {
    let prefix: Arc<str> = prefix.into();

    Middleware::from_fn(move |mut request: Request, next: Next| {
        let prefix = prefix.clone();
        async move {
            match stripped(request.uri(), &prefix) {
                Some(uri) => {
                    *request.uri_mut() = uri;
                    next.run(request).await
                }
                None => not_found(),
            }
        }
    })
}

fn stripped(uri: &Uri, prefix: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix(prefix)?;
    let path = if rest.is_empty() { "/" } else { rest };

    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
