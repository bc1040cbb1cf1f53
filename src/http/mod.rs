//! HTTP plumbing around the router tree.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, TraceLayer, connect info)
//!     → Router (routing::router, fallback service)
//!     → middleware/* (per node and per route)
//!     → context.rs (typed request extensions read by handlers)
//!     → buffered.rs (response capture for the access log)
//!     → Send to client
//! ```

pub mod buffered;
pub mod context;
pub mod middleware;
pub mod server;

pub use buffered::BufferedResponse;
pub use server::HttpServer;
