//! Fully buffered responses.
//!
//! # Responsibilities
//! - Collect a response body so its status and size can be observed
//! - Re-emit the same status, headers and bytes afterwards
//!
//! # Design Decisions
//! - The whole body is held in memory; streaming handlers lose their streaming
//!   behaviour behind the request logger

use axum::body::{Body, Bytes};
use axum::http::response::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::Response;

/// A response whose body has been read to the end.
#[derive(Debug)]
pub struct BufferedResponse {
    parts: Parts,
    body: Bytes,
}

impl BufferedResponse {
    /// Read `response` to the end.
    pub async fn capture(response: Response) -> Result<Self, axum::Error> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await?;
        Ok(Self { parts, body })
    }

    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Body length in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        Response::from_parts(self.parts, Body::from(self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[tokio::test]
    async fn test_capture_and_replay() {
        let original = (
            StatusCode::ACCEPTED,
            [(header::CONTENT_TYPE, "text/plain")],
            "buffered body",
        )
            .into_response();

        let buffered = BufferedResponse::capture(original).await.unwrap();
        assert_eq!(buffered.status(), StatusCode::ACCEPTED);
        assert_eq!(buffered.size(), 13);
        assert_eq!(buffered.headers()[header::CONTENT_TYPE], "text/plain");

        let replayed = buffered.into_response();
        assert_eq!(replayed.status(), StatusCode::ACCEPTED);
        let body = axum::body::to_bytes(replayed.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"buffered body");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let buffered = BufferedResponse::capture(StatusCode::NO_CONTENT.into_response())
            .await
            .unwrap();

        assert_eq!(buffered.status(), StatusCode::NO_CONTENT);
        assert_eq!(buffered.size(), 0);
    }
}
