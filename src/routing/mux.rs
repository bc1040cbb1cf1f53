//! Method + path dispatcher.
//!
//! # Responsibilities
//! - Accept `"METHOD /path/{param}"` and `"/subtree/"` registrations
//! - Match requests by path, then by method
//! - Expose captured `{param}` values to handlers
//!
//! # Design Decisions
//! - Path matching is delegated to `matchit`
//! - The table is published through `ArcSwap`: registration copies and swaps it,
//!   request-time reads never lock
//! - Clones share one table, so a group and its parent install into the same dispatcher
//! - A registration that fails leaves the published table untouched

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

use crate::http::context::PathParams;
use crate::routing::Handler;
use crate::{Error, Request, Response, Result};

const END_MARKER: &str = "{$}";
const CATCH_ALL: &str = "__subtree";

#[derive(Debug, Clone, Default)]
struct Endpoint {
    methods: Vec<(Method, Handler)>,
    any: Option<Handler>,
}

impl Endpoint {
    fn add(&mut self, method: Option<Method>, handler: Handler) -> bool {
        match method {
            None if self.any.is_some() => false,
            None => {
                self.any = Some(handler);
                true
            }
            Some(method) if self.methods.iter().any(|(m, _)| *m == method) => false,
            Some(method) => {
                self.methods.push((method, handler));
                true
            }
        }
    }

    fn select(&self, method: &Method) -> Option<&Handler> {
        let exact = |wanted: &Method| {
            self.methods
                .iter()
                .find(|(m, _)| m == wanted)
                .map(|(_, handler)| handler)
        };

        exact(method)
            .or_else(|| {
                if *method == Method::HEAD {
                    exact(&Method::GET)
                } else {
                    None
                }
            })
            .or(self.any.as_ref())
    }

    fn allow(&self) -> String {
        let mut methods: Vec<&str> = self.methods.iter().map(|(m, _)| m.as_str()).collect();
        if methods.contains(&"GET") && !methods.contains(&"HEAD") {
            methods.push("HEAD");
        }
        methods.sort_unstable();
        methods.join(", ")
    }
}

#[derive(Clone, Default)]
struct Table {
    matcher: matchit::Router<usize>,
    endpoints: Vec<Endpoint>,
    index: HashMap<String, usize>,
}

impl Table {
    fn insert(&mut self, pattern: &str, handler: Handler) -> Result<()> {
        let (method, path) = parse_pattern(pattern)?;
        let routes = matcher_routes(path);

        let slot = match self.index.get(&routes[0]) {
            Some(slot) => *slot,
            None => {
                let slot = self.endpoints.len();
                for route in &routes {
                    self.matcher
                        .insert(route.as_str(), slot)
                        .map_err(|e| Error::invalid_pattern(pattern, e))?;
                }
                self.endpoints.push(Endpoint::default());
                self.index.insert(routes[0].clone(), slot);
                slot
            }
        };

        if self.endpoints[slot].add(method, handler) {
            Ok(())
        } else {
            Err(Error::DuplicatePattern(pattern.to_string()))
        }
    }

    fn select(&self, request: &mut Request) -> std::result::Result<Handler, Response> {
        let path = request.uri().path().to_string();
        let matched = match self.matcher.at(&path) {
            Ok(matched) => matched,
            Err(_) => {
                tracing::debug!(path = %path, "No route matched");
                return Err((StatusCode::NOT_FOUND, "404 page not found").into_response());
            }
        };

        let endpoint = &self.endpoints[*matched.value];
        let Some(handler) = endpoint.select(request.method()) else {
            tracing::debug!(path = %path, method = %request.method(), "Method not allowed");
            let mut response =
                (StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed").into_response();
            if let Ok(allow) = HeaderValue::from_str(&endpoint.allow()) {
                response.headers_mut().insert(header::ALLOW, allow);
            }
            return Err(response);
        };

        let captured = matched
            .params
            .iter()
            .filter(|(key, _)| *key != CATCH_ALL)
            .map(|(key, value)| (key.to_string(), value.to_string()));
        match request.extensions_mut().get_mut::<PathParams>() {
            Some(params) => params.extend(captured),
            None => {
                request.extensions_mut().insert(captured.collect::<PathParams>());
            }
        }

        Ok(handler.clone())
    }
}

/// Split `"METHOD /path"` into its parts. The method is optional.
fn parse_pattern(pattern: &str) -> Result<(Option<Method>, &str)> {
    let (method, path) = match pattern.split_once(' ') {
        Some((method, path)) => {
            let method = Method::from_bytes(method.as_bytes())
                .map_err(|e| Error::invalid_pattern(pattern, e))?;
            (Some(method), path.trim_start())
        }
        None => (None, pattern),
    };

    if !path.starts_with('/') {
        return Err(Error::invalid_pattern(pattern, "path must start with '/'"));
    }

    Ok((method, path))
}

/// Matcher routes for one dispatcher path: `{$}` means exact, a trailing slash a subtree.
fn matcher_routes(path: &str) -> Vec<String> {
    if let Some(exact) = path.strip_suffix(END_MARKER) {
        vec![exact.to_string()]
    } else if path.ends_with('/') {
        vec![path.to_string(), format!("{path}{{*{CATCH_ALL}}}")]
    } else {
        vec![path.to_string()]
    }
}

/// A dispatcher handle.
#[derive(Clone)]
pub struct ServeMux {
    table: Arc<ArcSwap<Table>>,
}

impl ServeMux {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(Table::default())),
        }
    }

    /// Install `handler` under `pattern`.
    pub fn handle(&self, pattern: &str, handler: Handler) -> Result<()> {
        let mut table = Table::clone(&self.table.load());
        table.insert(pattern, handler)?;
        self.table.store(Arc::new(table));
        Ok(())
    }
}

impl fmt::Debug for ServeMux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.load();
        f.debug_struct("ServeMux")
            .field("patterns", &table.index.len())
            .finish()
    }
}

impl Default for ServeMux {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request> for ServeMux {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, std::result::Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let selected = self.table.load().select(&mut request);
        Box::pin(async move {
            match selected {
                Ok(handler) => handler.oneshot(request).await,
                Err(response) => Ok(response),
            }
        })
    }
}
