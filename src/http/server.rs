//! HTTP server setup.
//!
//! # Responsibilities
//! - Serve a router tree on a bound listener
//! - Wire up transport-level tracing and peer addresses
//! - Stop accepting on shutdown and drain in-flight requests

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routing::Router;

/// HTTP server for a router tree.
pub struct HttpServer {
    app: axum::Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(router: Router) -> Self {
        let app = axum::Router::new()
            .fallback_service(router)
            .layer(TraceLayer::new_for_http());
        Self { app }
    }

    /// Run the server until `shutdown` completes.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
