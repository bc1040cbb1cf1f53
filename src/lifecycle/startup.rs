//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the configured middleware stack
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;
use tokio::net::TcpListener;

use crate::config::{MiddlewareConfig, ServerConfig};
use crate::http::middleware;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::{Middleware, Registry, Router};

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid router setup: {0}")]
    Router(#[from] crate::Error),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The standard middleware stack, in execution order.
///
/// `registry` is attached to every request for named-route lookups.
pub fn middleware_stack(
    config: &MiddlewareConfig,
    registry: Registry,
) -> crate::Result<Vec<Middleware>> {
    let mut stack = vec![
        middleware::request_id(&config.request_id_header)?,
        middleware::real_ip(),
        middleware::request_logger(),
        middleware::recoverer(),
    ];

    if config.no_cache {
        stack.push(middleware::no_cache());
    }
    if !config.csp.is_empty() {
        stack.push(middleware::content_security_policy(&config.csp)?);
    }
    if !config.allowed_content_types.is_empty() {
        stack.push(middleware::content_type(config.allowed_content_types.iter().cloned()));
    }
    if !config.allowed_charsets.is_empty() {
        stack.push(middleware::content_charset(config.allowed_charsets.iter().cloned()));
    }
    if !config.allowed_encodings.is_empty() {
        stack.push(middleware::content_encoding(config.allowed_encodings.iter().cloned()));
    }

    stack.push(middleware::language(config.languages.iter().cloned()));
    if !config.language_cookie.is_empty() {
        stack.push(middleware::override_language(&config.language_cookie));
    }

    stack.push(middleware::locator(registry));

    if config.request_timeout_ms > 0 {
        stack.push(middleware::timeout(Duration::from_millis(config.request_timeout_ms)));
    }

    Ok(stack)
}

/// Serve `router` with `config` until SIGINT or SIGTERM.
pub async fn run(config: &ServerConfig, router: Router) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| {
                StartupError::MetricsAddress(config.observability.metrics_address.clone())
            })?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stopped = shutdown.wait();
    signals::spawn_signal_listener(shutdown);

    HttpServer::new(router).run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::context;
    use crate::routing::{Handler, Stack};
    use crate::Request;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[test]
    fn test_default_stack() {
        let stack = middleware_stack(&MiddlewareConfig::default(), Registry::new()).unwrap();
        // request id, real ip, logger, recoverer, language, override, locator, timeout
        assert_eq!(stack.len(), 8);
    }

    fn optional_config() -> MiddlewareConfig {
        MiddlewareConfig {
            no_cache: true,
            allowed_content_types: vec!["application/json".into()],
            allowed_charsets: vec!["utf-8".into()],
            allowed_encodings: vec!["gzip".into()],
            csp: [("default-src".to_string(), vec!["'self'".to_string()])].into(),
            language_cookie: String::new(),
            request_timeout_ms: 0,
            ..MiddlewareConfig::default()
        }
    }

    #[test]
    fn test_optional_middlewares_count() {
        let stack = middleware_stack(&optional_config(), Registry::new()).unwrap();
        // request id, real ip, logger, recoverer, no cache, csp,
        // content type, charset, encoding, language, locator
        assert_eq!(stack.len(), 11);
    }

    #[tokio::test]
    async fn test_optional_middlewares_take_effect() {
        let stack: Stack = middleware_stack(&optional_config(), Registry::new())
            .unwrap()
            .into_iter()
            .collect();
        let handler = stack.chain(Handler::from_fn(|request: Request| async move {
            context::language(&request).unwrap_or_default().to_string()
        }));

        let response = handler
            .serve(
                axum::http::Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["pragma"], "no-cache");
        assert_eq!(
            response.headers()["content-security-policy"],
            "default-src 'self'"
        );
        assert!(response.headers().contains_key("x-request-id"));

        let rejected = handler
            .serve(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "text/plain")
                    .header("content-length", "5")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await;
        assert_eq!(rejected.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_bad_header_name() {
        let config = MiddlewareConfig {
            request_id_header: "not valid".into(),
            ..MiddlewareConfig::default()
        };
        assert!(middleware_stack(&config, Registry::new()).is_err());
    }
}
