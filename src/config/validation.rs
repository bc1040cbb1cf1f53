//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, levels and header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};

use crate::config::schema::ServerConfig;
use crate::observability::logging::parse_level;

/// One problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if let Err(e) = parse_level(&config.logging.level) {
        errors.push(ValidationError::new("logging.level", e.to_string()));
    }

    let middleware = &config.middleware;
    if HeaderName::from_bytes(middleware.request_id_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "middleware.request_id_header",
            format!("{:?} is not a valid header name", middleware.request_id_header),
        ));
    }

    if middleware.languages.iter().any(|lang| lang.trim().is_empty()) {
        errors.push(ValidationError::new("middleware.languages", "empty language tag"));
    }

    for (directive, sources) in &middleware.csp {
        let rendered = format!("{directive} {}", sources.join(" "));
        if directive.is_empty() || HeaderValue::from_str(&rendered).is_err() {
            errors.push(ValidationError::new(
                "middleware.csp",
                format!("directive {directive:?} cannot be sent as a header"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
