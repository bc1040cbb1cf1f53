//! Route construction.
//!
//! # Responsibilities
//! - Hold one endpoint: method, path pattern, handler, optional name, middlewares
//! - Apply [`RouteOption`]s left to right at construction time
//!
//! # Design Decisions
//! - A route is immutable once built
//! - `with_middleware` reverses its batch and prepends it, so options applied in
//!   arrival order yield declared order == execution order after folding

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::{Handler, Location, Middleware, Stack};

/// One registered endpoint.
#[derive(Debug, Clone)]
pub struct Route {
    method: Option<Method>,
    path: String,
    handler: Handler,
    name: Option<String>,
    middlewares: Stack,
}

impl Route {
    /// Build a route, applying `options` in order.
    pub fn new<I>(
        method: Option<Method>,
        path: impl Into<String>,
        handler: Handler,
        options: I,
    ) -> Self
    where
        I: IntoIterator<Item = RouteOption>,
    {
        let mut route = Self {
            method,
            path: path.into(),
            handler,
            name: None,
            middlewares: Stack::new(),
        };

        for option in options {
            option.apply(&mut route);
        }

        route
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn middlewares(&self) -> &Stack {
        &self.middlewares
    }

    /// Dispatcher pattern: `"METHOD path"`, or just the path for method-less routes.
    pub fn pattern(&self) -> String {
        match &self.method {
            Some(method) => format!("{method} {}", self.path),
            None => self.path.clone(),
        }
    }

    /// The handler wrapped by every middleware of the route.
    pub fn handler(&self) -> Handler {
        self.middlewares.chain(self.handler.clone())
    }

    /// An unprefixed location for this route.
    pub fn location(&self) -> Location {
        Location::new(self.method.clone(), &self.path)
    }
}

/// A configuration step applied to a [`Route`] while it is built.
#[derive(Clone)]
pub struct RouteOption(Arc<dyn Fn(&mut Route) + Send + Sync>);

impl RouteOption {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Route) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn apply(&self, route: &mut Route) {
        (self.0)(route)
    }
}

impl fmt::Debug for RouteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RouteOption")
    }
}

/// Name the route so it is recorded in the registry. An empty name leaves it unnamed.
pub fn with_name(name: impl Into<String>) -> RouteOption {
    let name = name.into();
    RouteOption::new(move |route| {
        route.name = (!name.is_empty()).then(|| name.clone());
    })
}

/// Add a batch of middlewares, executed in the given order.
pub fn with_middleware<I>(middlewares: I) -> RouteOption
where
    I: IntoIterator<Item = Middleware>,
{
    let mut batch: Vec<Middleware> = middlewares.into_iter().collect();
    batch.reverse();

    RouteOption::new(move |route| route.middlewares.prepend(&batch))
}
