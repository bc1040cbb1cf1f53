//! Terminal request handlers.
//!
//! # Responsibilities
//! - Erase any `tower::Service` producing a response into one cloneable type
//! - Adapt plain async functions into handlers
//!
//! # Design Decisions
//! - Backed by `BoxCloneSyncService` so handlers can sit behind `axum::middleware::Next`
//! - Errors are `Infallible`: failures are expressed as responses

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};

use axum::response::IntoResponse;
use futures_util::future::BoxFuture;
use tower::util::BoxCloneSyncService;
use tower::{service_fn, Service, ServiceExt};

use crate::{Request, Response};

/// A cloneable, type-erased request handler.
#[derive(Clone)]
pub struct Handler(BoxCloneSyncService<Request, Response, Infallible>);

impl Handler {
    /// Wrap any infallible service whose response converts into a [`Response`].
    ///
    /// An `axum::Router` qualifies, which makes it mountable as-is.
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse + 'static,
        S::Future: Send + 'static,
    {
        let service = service.map_response(<S::Response as IntoResponse>::into_response);
        Self(BoxCloneSyncService::new(service))
    }

    /// Build a handler from an async function.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        Self::new(service_fn(move |request: Request| {
            let fut = f(request);
            async move { Ok::<_, Infallible>(fut.await) }
        }))
    }

    /// Run the handler to completion on one request.
    pub async fn serve(&self, request: Request) -> Response {
        match self.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

impl Service<Request> for Handler {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.0.call(request)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_from_fn_produces_response() {
        let handler = Handler::from_fn(|_req: Request| async { (StatusCode::CREATED, "made") });

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)

            .await

            .unwrap();
        assert_eq!(&body[..], b"made");
    }

    #[tokio::test]
    async fn test_wraps_axum_router() {
        let app = axum::Router::new()
            .route("/ping", axum::routing::get(|| async { "pong" }));
        let handler = Handler::new(app);

        let request = axum::http::Request::builder()
            .uri("/ping")
            .body(Body::empty())
            .unwrap();
        let response = handler.serve(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
