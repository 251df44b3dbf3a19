//! Middleware pipeline execution.
//!
//! Two ordered sequences run per request: the global middleware (before
//! matching, for every request) and the matched route's handler chain.

use std::sync::Arc;

use crate::dispatch::handler::{BoxedHandler, Handler, HandlerChain, Next};
use crate::http::{Request, Response};

/// How a handler chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every handler ran.
    Completed,
    /// A handler stopped the chain before its end.
    ShortCircuited { at: usize },
}

/// Run `chain` in order, stopping at the first handler that does not continue.
pub fn run_chain(chain: &HandlerChain, res: &mut Response, req: &mut Request) -> ChainOutcome {
    let handlers = chain.handlers();
    for (index, handler) in handlers.iter().enumerate() {
        let flow = handler.call(res, req, Next::new());
        if !flow.is_continue() && index + 1 < handlers.len() {
            return ChainOutcome::ShortCircuited { at: index };
        }
    }
    ChainOutcome::Completed
}

/// Global middleware applied to every request before route matching.
#[derive(Clone, Default)]
pub struct Pipeline {
    middleware: Vec<BoxedHandler>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<H: Handler>(&mut self, handler: H) {
        self.middleware.push(Arc::new(handler));
    }

    pub fn push_boxed(&mut self, handler: BoxedHandler) {
        self.middleware.push(handler);
    }

    pub(crate) fn into_handlers(self) -> Vec<BoxedHandler> {
        self.middleware
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run every middleware in registration order.
    ///
    /// Global middleware cannot stop dispatch: a halt only ends that
    /// middleware's own turn and matching still follows.
    pub fn run(&self, res: &mut Response, req: &mut Request) {
        for (index, middleware) in self.middleware.iter().enumerate() {
            if !middleware.call(res, req, Next::new()).is_continue() {
                tracing::debug!(index, path = %req.path(), "global middleware halted; ignored");
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("len", &self.middleware.len())
            .finish()
    }
}
