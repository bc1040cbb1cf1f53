//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router and middlewares produce:
//!     → logging.rs (tracing events and the per-request span)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into the log span of every request
//! - Metrics are cheap facade calls, recorded only when an exporter is installed

pub mod logging;
pub mod metrics;
