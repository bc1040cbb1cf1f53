//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Router::use_middleware → pending RouteOptions
//!     Router::method / mount
//!         → route.rs (apply options, build the Stack)
//!         → registry.rs (record named routes as Locations)
//!         → mux.rs (install the composed handler under "METHOD /path")
//!
//! Incoming Request:
//!     → mux.rs (path match, then method)
//!     → stack.rs (composed middlewares, declared order)
//!     → handler.rs (terminal handler)
//!
//! Reverse lookup:
//!     Registry::get(name) → location.rs (prefixes, params, query) → Uri
//! ```
//!
//! # Design Decisions
//! - Routes are built at startup; the dispatcher table is swapped, never locked
//! - Declared middleware order is execution order, across batches and tree levels
//! - A sub-router is mounted as a plain handler behind prefix stripping

pub mod handler;
pub mod location;
pub mod mux;
pub mod registry;
pub mod route;
pub mod router;
pub mod stack;

pub use handler::Handler;
pub use location::{Location, Query};
pub use mux::ServeMux;
pub use registry::Registry;
pub use route::{with_middleware, with_name, Route, RouteOption};
pub use router::Router;
pub use stack::{Middleware, Stack};
