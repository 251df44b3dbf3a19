//! HTTP-facing types and the transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, body buffering)
//!     → request.rs (request view: method, path, headers, body, params)
//!     → dispatch::Dispatcher (middleware, matching, chain)
//!     → response.rs (sink accumulated by handlers)
//!     → server.rs (convert sink into an HTTP response)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::Request;
pub use response::Response;
pub use server::HttpServer;
