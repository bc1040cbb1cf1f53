//! Access logging.
//!
//! # Responsibilities
//! - Run everything downstream inside a `request` span tagged with the request id
//! - Emit one event per request: method, path, remote, status, size, duration
//! - Feed the request metrics
//!
//! # Design Decisions
//! - The response is buffered to learn its size before the line is written
//! - Install after `request_id` and `real_ip` so both values are available

use std::time::Instant;

use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use tracing::Instrument;

use crate::http::buffered::BufferedResponse;
use crate::http::context;
use crate::http::middleware::real_ip::client_ip;
use crate::observability::metrics;
use crate::routing::Middleware;
use crate::{Request, Response};

/// Log every request once its response is complete.
pub fn request_logger() -> Middleware {
    Middleware::from_fn(log_request)
}

async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let remote = client_ip(&request)
        .map(|ip| ip.to_string())
        .unwrap_or_default();

    let span = tracing::info_span!(
        "request",
        request_id = context::request_id(&request).unwrap_or_default()
    );

    let response = next.run(request).instrument(span.clone()).await;

    let buffered = match BufferedResponse::capture(response).await {
        Ok(buffered) => buffered,
        Err(e) => {
            span.in_scope(|| {
                tracing::error!(error = %e, path = %path, "Failed to read response body")
            });
            metrics::record_request(method.as_str(), 500, start);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let status = buffered.status().as_u16();
    span.in_scope(|| {
        tracing::info!(
            method = %method,
            path = %path,
            remote = %remote,
            status,
            size = buffered.size(),
            duration_us = start.elapsed().as_micros() as u64,
            "Request"
        )
    });
    metrics::record_request(method.as_str(), status, start);

    buffered.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Handler;
    use axum::body::Body;

    #[tokio::test]
    async fn test_response_passes_through() {
        let handler = request_logger().wrap(Handler::from_fn(|_req: Request| async {
            (StatusCode::IM_A_TEAPOT, "short and stout")
        }));

        let request = axum::http::Request::builder()
            .uri("/pot?brew=1")
            .body(Body::empty())
            .unwrap();
        let response = handler.serve(request).await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"short and stout");
    }
}
