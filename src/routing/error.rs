//! Routing error definitions.

use axum::http::Method;
use thiserror::Error;

/// Why a registration pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    /// A `*` segment appeared before the end of the pattern.
    #[error("wildcard segment must be the last segment")]
    MisplacedWildcard,

    /// A `:` segment with nothing after the marker.
    #[error("parameter name is empty")]
    EmptyParamName,

    /// The same capture name was used twice in one pattern.
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParam(String),
}

/// Errors raised by route registration and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Malformed registration pattern. Raised at registration time only.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: PatternErrorKind,
    },

    /// A handler chain with zero handlers.
    #[error("route {method} {pattern} has an empty handler chain")]
    EmptyChain { method: Method, pattern: String },
}

impl RouteError {
    pub(crate) fn invalid(pattern: &str, reason: PatternErrorKind) -> Self {
        RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }
}
