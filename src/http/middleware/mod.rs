//! Built-in middleware handlers.
//!
//! Both follow the ordinary handler contract: `logger` is meant for the
//! global pipeline, `access_control` for route-local chains.

pub mod access_control;
pub mod logger;

pub use access_control::{Authenticated, BearerAuth};
pub use logger::RequestLogger;
