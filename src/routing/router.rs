//! Router tree.
//!
//! # Responsibilities
//! - Collect pending middlewares (`use_middleware`) and apply them to later registrations
//! - Register endpoints by method and record named ones in the node's registry
//! - Build child nodes: prefixed sub-routers (`route`), mounts and middleware groups
//!
//! # Design Decisions
//! - A node is a set of shared handles: groups reuse the dispatcher and registry of
//!   their parent, sub-routers get fresh ones
//! - Pending middlewares are snapshots; a group copies them, so its own `use_middleware`
//!   calls never reach the parent or its siblings
//! - Returned locations are unprefixed; prefixes are added by registry traversal

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::http::Method;
use tower::Service;

use crate::http::middleware::strip_prefix;
use crate::observability::metrics;
use crate::routing::{
    with_middleware, Handler, Location, Middleware, Registry, Route, RouteOption, ServeMux,
};
use crate::{Request, Response, Result};

/// One node of a router tree.
#[derive(Debug, Clone, Default)]
pub struct Router {
    mux: ServeMux,
    registry: Registry,
    route_options: Vec<RouteOption>,
}

impl Router {
    /// Create a root node with an empty dispatcher and registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue middlewares for every route and mount registered on this node afterwards.
    pub fn use_middleware<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.route_options.push(with_middleware(middlewares));
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Options passed here run after the node's pending ones. Named routes are
    /// recorded in this node's registry.
    pub fn method<I>(
        &self,
        method: Method,
        pattern: &str,
        handler: Handler,
        options: I,
    ) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        let options = self.route_options.iter().cloned().chain(options);
        let route = Route::new(Some(method), pattern, handler, options);
        self.install(&route)?;
        Ok(route.location())
    }

    pub fn get<I>(&self, pattern: &str, handler: Handler, options: I) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        self.method(Method::GET, pattern, handler, options)
    }

    pub fn post<I>(&self, pattern: &str, handler: Handler, options: I) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        self.method(Method::POST, pattern, handler, options)
    }

    pub fn put<I>(&self, pattern: &str, handler: Handler, options: I) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        self.method(Method::PUT, pattern, handler, options)
    }

    pub fn patch<I>(&self, pattern: &str, handler: Handler, options: I) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        self.method(Method::PATCH, pattern, handler, options)
    }

    pub fn delete<I>(&self, pattern: &str, handler: Handler, options: I) -> Result<Location>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        self.method(Method::DELETE, pattern, handler, options)
    }

    /// Serve everything under `prefix` with `handler`, which sees the path without `prefix`.
    ///
    /// The node's pending middlewares wrap the prefix stripping.
    pub fn mount(&self, prefix: &str, handler: Handler) -> Result<()> {
        let prefix = prefix.trim_end_matches('/');
        let options = self
            .route_options
            .iter()
            .cloned()
            .chain([with_middleware([strip_prefix(prefix)])]);

        let route = Route::new(None, format!("{prefix}/"), handler, options);
        self.install(&route)
    }

    /// Create a sub-router under `prefix`, let `build` populate it and return it.
    ///
    /// The child registry is linked only once the mount succeeds, so a taken
    /// prefix leaves the existing sub-router's names resolvable.
    pub fn route<F>(&self, prefix: &str, build: F) -> Result<Router>
    where
        F: FnOnce(&mut Router) -> Result<()>,
    {
        let prefix = prefix.trim_end_matches('/');
        let mut child = Router {
            mux: ServeMux::new(),
            registry: Registry::new(),
            route_options: Vec::new(),
        };

        self.mount(prefix, Handler::new(child.clone()))?;
        self.registry.attach(prefix, child.registry.clone());
        build(&mut child)?;
        Ok(child)
    }

    /// Create a middleware scope sharing this node's dispatcher and registry.
    pub fn group<F>(&self, build: F) -> Result<Router>
    where
        F: FnOnce(&mut Router) -> Result<()>,
    {
        let mut group = self.clone();
        build(&mut group)?;
        Ok(group)
    }

    /// The registry of this node.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn install(&self, route: &Route) -> Result<()> {
        let pattern = route.pattern();

        if let Some(name) = route.name() {
            self.registry.add(name, route.method().cloned(), route.path())?;
        }

        if let Err(e) = self.mux.handle(&pattern, route.handler()) {
            if let Some(name) = route.name() {
                self.registry.remove(name);
            }
            return Err(e);
        }

        tracing::debug!(
            pattern = %pattern,
            name = route.name().unwrap_or_default(),
            middlewares = route.middlewares().len(),
            "Route registered"
        );
        metrics::record_route_registered();

        Ok(())
    }
}

impl Service<Request> for Router {
    type Response = Response;
    type Error = Infallible;
    type Future = <ServeMux as Service<Request>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.mux.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.mux.call(request)
    }
}
