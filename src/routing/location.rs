//! Reverse URL templating for named routes.
//!
//! # Responsibilities
//! - Represent one declared route as a renderable value
//! - Accumulate mount prefixes, bind positional path parameters, assemble the query
//! - Render to an origin-form `Uri`
//!
//! # Design Decisions
//! - Persistent value: every `with_*` returns a new `Location`
//! - Placeholders are bound by position, not by name
//! - Missing parameters leave their placeholder verbatim; extra ones are ignored
//! - Bound values are inserted as given; callers encode them when needed
//! - Query keys render in ascending order (`BTreeMap`), repeated values in insertion order

use std::collections::BTreeMap;
use std::sync::LazyLock;

use axum::http::{Method, Uri};
use regex::{Captures, Regex};

use crate::{Error, Result};

/// Multi-valued query mapping.
pub type Query = BTreeMap<String, Vec<String>>;

const END_MARKER: &str = "{$}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("placeholder regex is valid"));

/// A resolved, parameterizable route location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    prefix: String,
    method: Option<Method>,
    pattern: String,
    path_params: Vec<String>,
    query: Query,
}

impl Location {
    /// Create an unprefixed location.
    pub fn new(method: Option<Method>, pattern: impl Into<String>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prepend `prefix` to the accumulated prefix.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            prefix: format!("{prefix}{}", self.prefix),
            ..self.clone()
        }
    }

    /// Bind positional values for the pattern's placeholders.
    pub fn with_path_params<I, S>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path_params: params.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Replace the whole query.
    pub fn with_query(&self, query: Query) -> Self {
        Self {
            query,
            ..self.clone()
        }
    }

    /// Add one query value, keeping any existing values for the key.
    pub fn with_query_param(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut location = self.clone();
        location.query.entry(key.into()).or_default().push(value.into());
        location
    }

    /// Render the location.
    pub fn url(&self) -> Result<Uri> {
        let target = self.render();

        if !target.starts_with('/') {
            return Err(Error::MalformedUrl(target));
        }

        match target.parse::<Uri>() {
            Ok(uri) if uri.scheme().is_none() && uri.authority().is_none() => Ok(uri),
            _ => Err(Error::MalformedUrl(target)),
        }
    }

    fn render(&self) -> String {
        let path = format!("{}{}", self.prefix, self.pattern).replace(END_MARKER, "");

        let mut params = self.path_params.iter();
        let mut target = PLACEHOLDER
            .replace_all(&path, |caps: &Captures| match params.next() {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned();

        if self.query.values().any(|values| !values.is_empty()) {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, values) in &self.query {
                for value in values {
                    serializer.append_pair(key, value);
                }
            }
            target.push('?');
            target.push_str(&serializer.finish());
        }

        target
    }
}
