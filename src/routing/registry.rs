//! Named-route registry.
//!
//! # Responsibilities
//! - Map route names to [`Location`]s, one registry per router-tree node
//! - Keep child registries keyed by their mount prefix
//! - Resolve names recursively, prepending every mount prefix on the way back up
//!
//! # Design Decisions
//! - Names are unique per node only; siblings may reuse a name
//! - First child holding the name wins; child prefixes are distinct by construction
//! - A `Registry` is a shared handle (`Arc`), so a node and its groups see one map

use std::sync::Arc;

use axum::http::Method;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::routing::Location;
use crate::{Error, Result};

#[derive(Debug, Default)]
struct Node {
    routes: DashMap<String, Location>,
    children: DashMap<String, Registry>,
}

/// A tree of name → location mappings.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Node>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a route under `name` at this node.
    pub fn add(&self, name: &str, method: Option<Method>, pattern: &str) -> Result<()> {
        match self.inner.routes.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateName(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Location::new(method, pattern));
                Ok(())
            }
        }
    }

    /// Forget a route recorded at this node. Absent names are ignored.
    pub fn remove(&self, name: &str) {
        self.inner.routes.remove(name);
    }

    /// Whether this node or any descendant knows `name`.
    pub fn has(&self, name: &str) -> bool {
        self.inner.routes.contains_key(name)
            || self.inner.children.iter().any(|child| child.value().has(name))
    }

    /// Resolve `name`, prefixed with every mount prefix between here and its node.
    pub fn get(&self, name: &str) -> Result<Location> {
        self.lookup(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Create and register an empty child registry for `prefix`.
    pub fn child(&self, prefix: &str) -> Registry {
        let registry = Registry::new();
        self.attach(prefix, registry.clone());
        registry
    }

    /// Register an existing registry as the child for `prefix`.
    pub(crate) fn attach(&self, prefix: &str, registry: Registry) {
        self.inner.children.insert(prefix.to_string(), registry);
    }

    fn lookup(&self, name: &str) -> Option<Location> {
        if let Some(location) = self.inner.routes.get(name) {
            return Some(location.value().clone());
        }

        self.inner.children.iter().find_map(|child| {
            child
                .value()
                .lookup(name)
                .map(|location| location.with_prefix(child.key()))
        })
    }
}
