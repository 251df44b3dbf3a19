//! Middleware pipeline and dispatcher.
//!
//! # Data Flow
//! ```text
//! PreMatch (request view + response sink, properties attached)
//!     → GlobalMiddleware (pipeline.rs, every request, cannot block)
//!     → RouteMatching (routing::Router::resolve)
//!         ├─ no match → NotFound (not-found chain or default body)
//!         └─ match    → params attached → ChainExecuting
//!     → ChainExecuting (handler.rs Next capability decides continuation)
//!     → Completed | ShortCircuited
//! ```
//!
//! # Design Decisions
//! - One continuation model for middleware and route handlers
//! - Per-request state never leaves the request's task
//! - Application properties are frozen into an `Arc` at build time

pub mod dispatcher;
pub mod handler;
pub mod pipeline;
pub mod properties;

pub use dispatcher::{Bundle, Dispatcher, DispatcherBuilder, Outcome, NOT_FOUND_BODY};
pub use handler::{handler_fn, BoxedHandler, Flow, Handler, HandlerChain, Next};
pub use pipeline::{run_chain, ChainOutcome, Pipeline};
pub use properties::Properties;
