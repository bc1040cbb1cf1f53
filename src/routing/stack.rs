//! Middleware stacks.
//!
//! # Responsibilities
//! - Represent one handler-wrapping function as a [`Middleware`]
//! - Fold an ordered [`Stack`] of middlewares around a terminal handler
//!
//! # Design Decisions
//! - Folding is in installation order: the last element becomes the outermost wrapper
//! - Producers that want declared order to equal execution order reverse their batch
//!   before prepending it (see `route::with_middleware`)

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::middleware::Next;
use axum::response::IntoResponse;
use tower::{Layer, Service};

use crate::routing::Handler;
use crate::Request;

/// A function wrapping a handler into a new handler.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Handler) -> Handler + Send + Sync>);

impl Middleware {
    /// Create a middleware from a wrapping function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Create a middleware from a `tower::Layer`.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Handler> + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::new(move |next| Handler::new(layer.layer(next)))
    }

    /// Create a middleware from an `async fn(Request, Next) -> impl IntoResponse`.
    pub fn from_fn<F, Fut, Out>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
        Out: IntoResponse + 'static,
    {
        Self::layer(axum::middleware::from_fn::<F, (Request,)>(f))
    }

    /// Wrap `next`, returning the new outer handler.
    pub fn wrap(&self, next: Handler) -> Handler {
        (self.0)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}

/// An ordered list of middlewares.
#[derive(Debug, Clone, Default)]
pub struct Stack(Vec<Middleware>);

impl Stack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware; it will wrap everything installed before it.
    pub fn push(&mut self, middleware: Middleware) {
        self.0.push(middleware);
    }

    /// Insert a batch in front of the existing middlewares, keeping the batch's order.
    pub fn prepend(&mut self, batch: &[Middleware]) {
        self.0.splice(0..0, batch.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold the stack around `handler`.
    pub fn chain(&self, handler: Handler) -> Handler {
        self.0
            .iter()
            .fold(handler, |chain, middleware| middleware.wrap(chain))
    }
}

impl FromIterator<Middleware> for Stack {
    fn from_iter<I: IntoIterator<Item = Middleware>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
