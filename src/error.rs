//! Router configuration errors.
//!
//! # Design Decisions
//! - Every variant is a setup mistake (bad pattern, duplicate name, unknown name)
//! - Returned from build and lookup calls; never produced while serving a request
//! - Routing misses are responses (404/405), not errors

use axum::http::header::{InvalidHeaderName, InvalidHeaderValue};

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised while building the router tree or resolving a location.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A route name was added twice to the same registry node.
    #[error("location {0} already exists")]
    DuplicateName(String),

    /// No registry node in the searched subtree knows the name.
    #[error("location {0} does not exist")]
    NotFound(String),

    /// The rendered location is not a valid origin-form URI.
    #[error("cannot parse URL ({0})")]
    MalformedUrl(String),

    /// The same method and path were installed twice into one dispatcher.
    #[error("pattern {0} is already registered")]
    DuplicatePattern(String),

    /// The dispatcher refused the pattern.
    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A middleware was configured with a value that cannot be sent as a header.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),

    /// A location lookup ran on a request that never went through the locator middleware.
    #[error("no registry attached to the request")]
    RegistryMissing,
}

impl Error {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}
