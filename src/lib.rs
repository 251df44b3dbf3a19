//! Embeddable HTTP request router and middleware dispatcher.
//!
//! Register routes on a [`Router`], freeze it into a [`Dispatcher`] together
//! with global middleware and application properties, then hand requests to
//! [`Dispatcher::dispatch`] directly or serve them through [`HttpServer`].

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use dispatch::{handler_fn, Bundle, Dispatcher, Flow, Handler, HandlerChain, Next, Outcome};
pub use http::{HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use routing::{Params, RouteError, Router};
