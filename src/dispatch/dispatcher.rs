//! Request dispatch.
//!
//! # Responsibilities
//! - Attach frozen properties to the request view
//! - Run global middleware, then resolve the route
//! - Attach captured params and run the matched chain
//! - Fall back to the not-found chain or the default body
//!
//! # Design Decisions
//! - The dispatcher owns the router, so tables cannot change once serving
//! - Handler failures are not caught here; that is the transport's call
//! - No I/O and no suspension inside dispatch itself

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderValue, StatusCode};

use crate::dispatch::handler::Handler;
use crate::dispatch::pipeline::{run_chain, ChainOutcome, Pipeline};
use crate::dispatch::properties::Properties;
use crate::http::{Request, Response};
use crate::observability::metrics;
use crate::routing::{RouteError, Router};

/// Body written when no route matches and no not-found chain is set.
pub const NOT_FOUND_BODY: &str = "No matching route found";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    ShortCircuited,
    NotFound,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::ShortCircuited => "short_circuited",
            Outcome::NotFound => "not_found",
        }
    }
}

/// Middleware and routers grouped for one-shot registration.
#[derive(Debug, Default)]
pub struct Bundle {
    pub middleware: Pipeline,
    pub routers: Vec<Router>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn middleware<H: Handler>(mut self, handler: H) -> Self {
        self.middleware.push(handler);
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.routers.push(router);
        self
    }
}

/// Registration-phase builder for a [`Dispatcher`].
#[derive(Debug)]
pub struct DispatcherBuilder {
    router: Router,
    middleware: Pipeline,
    properties: Properties,
}

impl DispatcherBuilder {
    /// Append a global middleware.
    pub fn middleware<H: Handler>(mut self, handler: H) -> Self {
        self.middleware.push(handler);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Append a bundle's middleware and merge its routers at the root.
    pub fn bundle(mut self, bundle: Bundle) -> Self {
        for handler in bundle.middleware.into_handlers() {
            self.middleware.push_boxed(handler);
        }
        for router in bundle.routers {
            self.router.use_router(router);
        }
        self
    }

    pub fn build(self) -> Dispatcher {
        tracing::info!(
            routes = self.router.len(),
            middleware = self.middleware.len(),
            properties = self.properties.len(),
            "Dispatcher ready"
        );
        for (method, pattern) in self.router.routes() {
            tracing::debug!(method = %method, pattern = %pattern, "Serving route");
        }
        Dispatcher {
            router: self.router,
            middleware: self.middleware,
            properties: Arc::new(self.properties),
        }
    }
}

/// Single entry point from the transport layer into routing.
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    middleware: Pipeline,
    properties: Arc<Properties>,
}

impl Dispatcher {
    pub fn builder(router: Router) -> DispatcherBuilder {
        DispatcherBuilder {
            router,
            middleware: Pipeline::new(),
            properties: Properties::new(),
        }
    }

    /// Dispatcher with no global middleware and no properties.
    pub fn new(router: Router) -> Self {
        Self::builder(router).build()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Run one request through middleware, matching and its chain.
    ///
    /// Fails only if a matched route has no handlers, which registration
    /// rules out.
    pub fn dispatch(&self, req: &mut Request, res: &mut Response) -> Result<Outcome, RouteError> {
        let start = Instant::now();
        req.set_properties(Arc::clone(&self.properties));

        if !self.middleware.is_empty() {
            self.middleware.run(res, req);
        }

        let outcome = match self.router.resolve(req.method(), req.path()) {
            Some(found) => {
                if found.chain.is_empty() {
                    tracing::error!(method = %req.method(), pattern = %found.pattern, "Matched route has no handlers");
                    metrics::record_dispatch("error", start);
                    return Err(RouteError::EmptyChain {
                        method: req.method().clone(),
                        pattern: found.pattern.to_string(),
                    });
                }
                req.set_params(found.params);
                match run_chain(found.chain, res, req) {
                    ChainOutcome::Completed => Outcome::Completed,
                    ChainOutcome::ShortCircuited { at } => {
                        tracing::debug!(pattern = %found.pattern, handler = at, "Chain short-circuited");
                        Outcome::ShortCircuited
                    }
                }
            }
            None => {
                tracing::debug!(method = %req.method(), path = %req.path(), "No route matched");
                self.not_found(req, res);
                Outcome::NotFound
            }
        };

        metrics::record_dispatch(outcome.as_str(), start);
        Ok(outcome)
    }

    fn not_found(&self, req: &mut Request, res: &mut Response) {
        match self.router.not_found_chain() {
            Some(chain) => {
                run_chain(chain, res, req);
            }
            None => default_not_found(res),
        }
    }
}

fn default_not_found(res: &mut Response) {
    res.status(StatusCode::NOT_FOUND)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .write(NOT_FOUND_BODY);
}

impl From<Router> for Dispatcher {
    fn from(router: Router) -> Self {
        Dispatcher::new(router)
    }
}
