//! Request identifiers.

use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use uuid::Uuid;

use crate::http::context::RequestId;
use crate::routing::Middleware;
use crate::{Request, Result};

/// Default header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the id found in `header`, or generate a UUID v4.
///
/// The id is stored as a [`RequestId`] extension and echoed on the response.
pub fn request_id(header: &str) -> Result<Middleware> {
    let header = HeaderName::from_bytes(header.as_bytes())?;

    Ok(Middleware::from_fn(move |mut request: Request, next: Next| {
        let header = header.clone();
        async move {
            let id = request
                .headers()
                .get(&header)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            request.extensions_mut().insert(RequestId(id.clone()));

            let mut response = next.run(request).await;
            if let Ok(value) = HeaderValue::from_str(&id) {
                response.headers_mut().insert(header, value);
            }
            response
        }
    }))
}
