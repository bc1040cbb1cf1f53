//! Request-scoped values.
//!
//! # Responsibilities
//! - Define the typed values middlewares attach to a request
//! - Provide accessors that return `None` when a value was never attached
//!
//! # Design Decisions
//! - Values live in `http::Extensions`, keyed by type
//! - `location` is the one accessor that fails: a named-route lookup without the
//!   locator middleware is a wiring mistake

use std::net::IpAddr;

use crate::routing::{Location, Registry};
use crate::{Error, Request, Result};

/// Request identifier set by the request-id middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Client address resolved by the real-ip middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealIp(pub IpAddr);

/// Negotiated language tag set by the language middlewares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(pub String);

/// Placeholder values captured by the dispatcher, outermost mount first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// The value captured for `name`; the innermost capture wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, String)> for PathParams {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

pub fn request_id(request: &Request) -> Option<&str> {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
}

pub fn real_ip(request: &Request) -> Option<IpAddr> {
    request.extensions().get::<RealIp>().map(|ip| ip.0)
}

pub fn language(request: &Request) -> Option<&str> {
    request
        .extensions()
        .get::<Language>()
        .map(|lang| lang.0.as_str())
}

/// Value captured by a `{name}` placeholder of the matched pattern.
pub fn path_param<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.extensions().get::<PathParams>()?.get(name)
}

/// Registry attached by the locator middleware.
pub fn registry(request: &Request) -> Option<&Registry> {
    request.extensions().get::<Registry>()
}

/// Resolve a named route through the request's registry.
pub fn location(request: &Request, name: &str) -> Result<Location> {
    registry(request).ok_or(Error::RegistryMissing)?.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;

    #[test]
    fn test_absent_values() {
        let request = Request::new(Body::empty());

        assert_eq!(request_id(&request), None);
        assert_eq!(real_ip(&request), None);
        assert_eq!(language(&request), None);
        assert_eq!(path_param(&request, "id"), None);
        assert!(matches!(location(&request, "home"), Err(Error::RegistryMissing)));
    }

    #[test]
    fn test_present_values() {
        let registry = Registry::new();
        registry.add("home", Some(Method::GET), "/").unwrap();

        let mut request = Request::new(Body::empty());
        request.extensions_mut().insert(RequestId("abc".into()));
        request.extensions_mut().insert(Language("fr".into()));
        request.extensions_mut().insert(registry);
        request
            .extensions_mut()
            .insert(PathParams::from_iter([("id".to_string(), "7".to_string())]));

        assert_eq!(request_id(&request), Some("abc"));
        assert_eq!(language(&request), Some("fr"));
        assert_eq!(path_param(&request, "id"), Some("7"));
        assert_eq!(location(&request, "home").unwrap().pattern(), "/");
    }

    #[test]
    fn test_innermost_param_wins() {
        let mut params: PathParams = [("id".to_string(), "outer".to_string())]
            .into_iter()
            .collect();
        params.extend([("id".to_string(), "inner".to_string())]);

        assert_eq!(params.get("id"), Some("inner"));
        assert_eq!(params.iter().count(), 2);
    }
}
