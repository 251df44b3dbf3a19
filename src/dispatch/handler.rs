//! Handler contract and continuation capability.

use std::fmt;
use std::sync::Arc;

use crate::http::{Request, Response};

/// What a handler decided about the rest of its chain.
#[must_use = "a handler must return its continuation decision"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flow(Step);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Halt,
}

impl Flow {
    /// Stop the chain here. Needs no capability.
    pub fn halt() -> Self {
        Flow(Step::Halt)
    }

    pub fn is_continue(self) -> bool {
        self.0 == Step::Continue
    }
}

/// Continuation capability passed to each handler.
///
/// Only `Next::run` yields a continuing [`Flow`], so a handler that never
/// touches its `Next` cannot let the chain proceed.
#[derive(Debug)]
pub struct Next {
    _private: (),
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// Proceed to the next handler in the chain.
    pub fn run(self) -> Flow {
        Flow(Step::Continue)
    }

    /// Short-circuit: skip every remaining handler.
    pub fn halt(self) -> Flow {
        Flow::halt()
    }
}

/// Capability every handler and middleware implements.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, res: &mut Response, req: &mut Request, next: Next) -> Flow;
}

impl<F> Handler for F
where
    F: Fn(&mut Response, &mut Request, Next) -> Flow + Send + Sync + 'static,
{
    fn call(&self, res: &mut Response, req: &mut Request, next: Next) -> Flow {
        self(res, req, next)
    }
}

/// Pin down a closure's signature so it can be used as a [`Handler`].
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut Response, &mut Request, Next) -> Flow + Send + Sync + 'static,
{
    f
}

pub type BoxedHandler = Arc<dyn Handler>;

/// Ordered, non-empty handlers bound to one route.
#[derive(Clone)]
pub struct HandlerChain {
    handlers: Vec<BoxedHandler>,
}

impl HandlerChain {
    /// Start a chain with its first handler.
    pub fn new<H: Handler>(first: H) -> Self {
        let first: BoxedHandler = Arc::new(first);
        Self {
            handlers: vec![first],
        }
    }

    /// Append a handler.
    pub fn then<H: Handler>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Build a chain from already boxed handlers. `None` when empty.
    pub fn from_handlers(handlers: Vec<BoxedHandler>) -> Option<Self> {
        (!handlers.is_empty()).then_some(Self { handlers })
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn handlers(&self) -> &[BoxedHandler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn ok(res: &mut Response, _req: &mut Request, next: Next) -> Flow {
        res.send("ok");
        next.run()
    }

    #[test]
    fn test_flow_from_capability() {
        assert!(Next::new().run().is_continue());
        assert!(!Next::new().halt().is_continue());
        assert!(!Flow::halt().is_continue());
    }

    #[test]
    fn test_fn_items_and_closures_are_handlers() {
        let chain = HandlerChain::new(ok).then(handler_fn(|_res, req, next| {
            if req.path() == "/" {
                next.run()
            } else {
                next.halt()
            }
        }));
        assert_eq!(chain.len(), 2);

        let mut res = Response::new();
        let mut req = Request::new(Method::GET, "/");
        let flow = chain.handlers()[0].call(&mut res, &mut req, Next::new());
        assert!(flow.is_continue());
        assert_eq!(res.body_text(), "ok");
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(HandlerChain::from_handlers(Vec::new()).is_none());
        let one: BoxedHandler = Arc::new(ok);
        assert_eq!(HandlerChain::from_handlers(vec![one]).map(|c| c.len()), Some(1));
    }
}
