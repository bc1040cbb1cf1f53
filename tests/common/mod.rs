//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, StatusCode};
use tokio::net::TcpListener;
use tower::ServiceExt;

use waypoint::{Handler, HttpServer, Middleware, Next, Request, Router, Shutdown};

/// Ordered log of middleware and handler calls.
pub type Calls = Arc<Mutex<Vec<String>>>;

/// A middleware recording `before:{id}` and `after:{id}` around downstream.
pub fn recording(id: &'static str, calls: &Calls) -> Middleware {
    let calls = calls.clone();
    Middleware::from_fn(move |request: Request, next: Next| {
        let calls = calls.clone();
        async move {
            calls.lock().unwrap().push(format!("before:{id}"));
            let response = next.run(request).await;
            calls.lock().unwrap().push(format!("after:{id}"));
            response
        }
    })
}

/// A handler recording `handler` and answering `body`.
#[allow(dead_code)]
pub fn recording_handler(calls: &Calls, body: &'static str) -> Handler {
    let calls = calls.clone();
    Handler::from_fn(move |_request: Request| {
        let calls = calls.clone();
        async move {
            calls.lock().unwrap().push("handler".to_string());
            body
        }
    })
}

/// A handler answering with a fixed body.
pub fn text(body: &'static str) -> Handler {
    Handler::from_fn(move |_request: Request| async move { body })
}

/// Send one request through `router` without a network.
#[allow(dead_code)]
pub async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Serve `router` on an ephemeral port until `shutdown` triggers.
#[allow(dead_code)]
pub async fn spawn_server(router: Router, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stopped = shutdown.wait();

    tokio::spawn(async move {
        HttpServer::new(router).run(listener, stopped).await.unwrap();
    });

    addr
}
