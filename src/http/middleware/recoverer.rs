//! Panic recovery.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use tower_http::catch_panic::CatchPanicLayer;

use crate::routing::Middleware;
use crate::Response;

/// Turn a panic anywhere downstream into a logged 500.
pub fn recoverer() -> Middleware {
    Middleware::layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(error = %message, "Panic recovered");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
