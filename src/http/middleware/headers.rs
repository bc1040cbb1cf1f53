//! Response header policies.

use std::collections::BTreeMap;

use axum::http::{header, HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::routing::Middleware;
use crate::Result;

const SURROGATE_CONTROL: HeaderName = HeaderName::from_static("surrogate-control");

/// Disable caching, unless the handler chose its own caching headers.
pub fn no_cache() -> Middleware {
    Middleware::layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                header::EXPIRES,
                HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static(
                    "no-cache, no-store, no-transform, must-revalidate, private, max-age=0",
                ),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                SURROGATE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
    )
}

/// Set `Content-Security-Policy` from directive → sources.
///
/// Directives are rendered in ascending order as `directive source source`, joined by `; `.
pub fn content_security_policy(policy: &BTreeMap<String, Vec<String>>) -> Result<Middleware> {
    let value = HeaderValue::from_str(&render_policy(policy))?;

    Ok(Middleware::layer(SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        value,
    )))
}

fn render_policy(policy: &BTreeMap<String, Vec<String>>) -> String {
    policy
        .iter()
        .map(|(directive, sources)| format!("{directive} {}", sources.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}
