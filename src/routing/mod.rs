//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     "/users/:id" + HandlerChain
//!     → matcher.rs (compile to segments)
//!     → router.rs (append to the method's table)
//!     → mount/use_router merges child tables under a literal prefix
//!
//! Incoming Request (method, path)
//!     → router.rs (scan the method's table in order)
//!     → matcher.rs (lockstep walk, capture params)
//!     → Return: matched chain + Params, or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod error;
pub mod matcher;
pub mod params;
pub mod router;

pub use error::{PatternErrorKind, RouteError};
pub use matcher::{RoutePattern, Segment};
pub use params::Params;
pub use router::{RouteMatch, Router};
