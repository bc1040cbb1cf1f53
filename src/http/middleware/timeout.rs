//! Request deadlines.

use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;

use crate::routing::Middleware;
use crate::Request;

/// Answer 504 when downstream has not produced a response within `duration`.
///
/// The downstream future is dropped on expiry.
pub fn timeout(duration: Duration) -> Middleware {
    Middleware::from_fn(move |request: Request, next: Next| async move {
        let path = request.uri().path().to_string();
        match tokio::time::timeout(duration, next.run(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(
                    path = %path,
                    timeout_ms = duration.as_millis() as u64,
                    "Request timed out"
                );
                (StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout").into_response()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Handler;
    use axum::body::Body;

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let slow = Handler::from_fn(|_req: Request| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            "too late"
        });
        let handler = timeout(Duration::from_millis(10)).wrap(slow);

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_within_deadline() {
        let handler = timeout(Duration::from_millis(200))
            .wrap(Handler::from_fn(|_req: Request| async { "on time" }));

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
