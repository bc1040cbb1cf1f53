//! Registry injection.

use axum::middleware::Next;

use crate::routing::{Middleware, Registry};
use crate::Request;

/// Attach `registry` to every request so handlers can resolve named routes.
///
/// Pass the root router's registry to resolve names anywhere in the tree.
pub fn locator(registry: Registry) -> Middleware {
    Middleware::from_fn(move |mut request: Request, next: Next| {
        request.extensions_mut().insert(registry.clone());
        next.run(request)
    })
}
