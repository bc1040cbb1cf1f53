//! Ready-made middlewares.
//!
//! # Data Flow
//! ```text
//! Request
//!     → request_id.rs   (RequestId extension, echoed header)
//!     → real_ip.rs      (RealIp extension from forwarding headers or peer)
//!     → logger.rs       (span per request, access log line, metrics)
//!     → recoverer.rs    (panic → 500)
//!     → headers.rs      (no-cache, Content-Security-Policy)
//!     → content.rs      (415 for disallowed type / charset / encoding)
//!     → language.rs     (Language extension)
//!     → locator.rs      (Registry extension)
//!     → timeout.rs      (504 when downstream is too slow)
//!     → prefix.rs       (mount prefix stripping)
//!     → Handler
//! ```
//!
//! Every constructor returns a [`Middleware`](crate::routing::Middleware); the order
//! above is the order the demo binary installs them in, not a requirement.

pub mod content;
pub mod headers;
pub mod language;
pub mod locator;
pub mod logger;
pub mod prefix;
pub mod real_ip;
pub mod recoverer;
pub mod request_id;
pub mod timeout;

pub use content::{content_charset, content_encoding, content_type};
pub use headers::{content_security_policy, no_cache};
pub use language::{language, override_language};
pub use locator::locator;
pub use logger::request_logger;
pub use prefix::strip_prefix;
pub use real_ip::real_ip;
pub use recoverer::recoverer;
pub use request_id::{request_id, REQUEST_ID_HEADER};
pub use timeout::timeout;
