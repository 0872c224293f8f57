use std::collections::HashMap;

use axum::http::Method;

use crate::roles::Role;

/// Allow-lists keyed by `(method, route path)`.
///
/// Routers look their entries up at build time; a route without an entry is
/// a wiring error, not an open route.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    entries: HashMap<(Method, String), Vec<Role>>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, method: Method, path: impl Into<String>, roles: &[Role]) -> Self {
        self.entries.insert((method, path.into()), roles.to_vec());
        self
    }

    pub fn roles_for(&self, method: &Method, path: &str) -> Option<&[Role]> {
        self.entries
            .get(&(method.clone(), path.to_string()))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &str, &[Role])> {
        self.entries
            .iter()
            .map(|((method, path), roles)| (method, path.as_str(), roles.as_slice()))
    }
}
