//! Composable HTTP router with ordered middleware chains and named-route URLs.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

/// Request type flowing through handlers and middlewares.
pub type Request = axum::extract::Request;

/// Response type produced by handlers and middlewares.
pub type Response = axum::response::Response;

pub use axum::middleware::Next;
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{
    with_middleware, with_name, Handler, Location, Middleware, Query, Registry, Route, RouteOption,
    Router, ServeMux, Stack,
};
