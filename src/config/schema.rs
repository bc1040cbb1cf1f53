//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Log level and output format.
    pub logging: LoggingConfig,

    /// Settings for the standard middleware stack.
    pub middleware: MiddlewareConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Standard middleware stack configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Header read and echoed by the request-id middleware.
    pub request_id_header: String,

    /// Per-request deadline in milliseconds (0 disables it).
    pub request_timeout_ms: u64,

    /// Send no-cache headers on every response.
    pub no_cache: bool,

    /// Supported languages, the first one being the default.
    pub languages: Vec<String>,

    /// Cookie that overrides the negotiated language (empty disables it).
    pub language_cookie: String,

    /// Accepted request media types (empty disables the check).
    pub allowed_content_types: Vec<String>,

    /// Accepted request charsets (empty disables the check).
    pub allowed_charsets: Vec<String>,

    /// Accepted request content encodings (empty disables the check).
    pub allowed_encodings: Vec<String>,

    /// Content-Security-Policy directives → sources (empty disables the header).
    pub csp: BTreeMap<String, Vec<String>>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_id_header: "x-request-id".to_string(),
            request_timeout_ms: 30_000,
            no_cache: false,
            languages: vec!["en".to_string()],
            language_cookie: "lang".to_string(),
            allowed_content_types: Vec::new(),
            allowed_charsets: Vec::new(),
            allowed_encodings: Vec::new(),
            csp: BTreeMap::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address of the Prometheus scrape listener.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
