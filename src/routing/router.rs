//! Route table and router composition.
//!
//! # Responsibilities
//! - Store compiled routes per HTTP method, in registration order
//! - Resolve a method and path to the first structurally matching route
//! - Merge other routers under a literal path prefix (mounting)
//! - Hold the optional not-found chain
//!
//! # Design Decisions
//! - First match wins: registration order is the only priority
//! - Re-registering an identical pattern replaces its chain in place
//! - Mutated only before serving; the dispatcher takes ownership afterwards
//! - O(n) scan per method (acceptable for typical route counts)

use std::collections::HashMap;

use axum::http::Method;

use crate::dispatch::handler::{BoxedHandler, Handler, HandlerChain};
use crate::routing::error::RouteError;
use crate::routing::matcher::RoutePattern;
use crate::routing::params::Params;

#[derive(Debug, Clone)]
struct RouteEntry {
    pattern: RoutePattern,
    chain: HandlerChain,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub pattern: &'a RoutePattern,
    pub chain: &'a HandlerChain,
    pub params: Params,
}

/// Per-method route tables plus a not-found fallback.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: HashMap<Method, Vec<RouteEntry>>,
    not_found: Option<HandlerChain>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler chain for `method` and `pattern`.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        chain: HandlerChain,
    ) -> Result<&mut Self, RouteError> {
        let compiled = RoutePattern::compile(pattern)?;
        tracing::debug!(method = %method, pattern = %compiled, handlers = chain.len(), "Route registered");
        self.insert(method, compiled, chain);
        Ok(self)
    }

    /// Register already boxed handlers. Fails on an empty list.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handlers: Vec<BoxedHandler>,
    ) -> Result<&mut Self, RouteError> {
        let chain = HandlerChain::from_handlers(handlers).ok_or_else(|| RouteError::EmptyChain {
            method: method.clone(),
            pattern: pattern.to_string(),
        })?;
        self.route(method, pattern, chain)
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::GET, pattern, HandlerChain::new(handler))
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::POST, pattern, HandlerChain::new(handler))
    }

    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::PUT, pattern, HandlerChain::new(handler))
    }

    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::PATCH, pattern, HandlerChain::new(handler))
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::DELETE, pattern, HandlerChain::new(handler))
    }

    pub fn options<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::OPTIONS, pattern, HandlerChain::new(handler))
    }

    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::HEAD, pattern, HandlerChain::new(handler))
    }

    /// Set the chain run when no route matches.
    pub fn not_found(&mut self, chain: HandlerChain) -> &mut Self {
        self.not_found = Some(chain);
        self
    }

    pub fn not_found_chain(&self) -> Option<&HandlerChain> {
        self.not_found.as_ref()
    }

    /// Merge `child`'s routes under `prefix`.
    ///
    /// The prefix is taken literally; `:` and `*` inside it are not markers.
    /// Child entries land after the parent's existing ones for each method,
    /// except a child pattern identical to one the parent already has: that
    /// replaces the parent's chain in place, like any re-registration.
    /// The child's not-found chain is dropped.
    pub fn mount(&mut self, prefix: &str, child: Router) -> &mut Self {
        let prefix = RoutePattern::literal(prefix);
        if child.not_found.is_some() {
            tracing::debug!(prefix = %prefix, "Mounted router's not-found chain ignored");
        }

        let mut mounted = 0usize;
        for (method, entries) in child.routes {
            for entry in entries {
                let pattern = entry.pattern.prefixed(&prefix);
                self.insert(method.clone(), pattern, entry.chain);
                mounted += 1;
            }
        }
        tracing::debug!(prefix = %prefix, routes = mounted, "Router mounted");
        self
    }

    /// Merge `other`'s routes at the root. Same as `mount("/", other)`.
    pub fn use_router(&mut self, other: Router) -> &mut Self {
        self.mount("/", other)
    }

    /// Find the first route for `method` whose pattern matches `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.get(method)?.iter().find_map(|entry| {
            entry.pattern.match_path(path).map(|params| RouteMatch {
                pattern: &entry.pattern,
                chain: &entry.chain,
                params,
            })
        })
    }

    /// Registered `(method, pattern)` pairs, grouped by method name.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut methods: Vec<&Method> = self.routes.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
            .into_iter()
            .flat_map(|method| {
                self.routes[method]
                    .iter()
                    .map(move |entry| (method.clone(), entry.pattern.to_string()))
            })
            .collect()
    }

    /// Total number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, method: Method, pattern: RoutePattern, chain: HandlerChain) {
        let entries = self.routes.entry(method).or_default();
        match entries.iter_mut().find(|e| e.pattern == pattern) {
            Some(existing) => existing.chain = chain,
            None => entries.push(RouteEntry { pattern, chain }),
        }
    }
}
