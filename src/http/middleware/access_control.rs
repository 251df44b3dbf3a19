//! Access Control Middleware.
//! Guards a route chain behind a bearer token.

use axum::http::{header, HeaderValue, StatusCode};

use crate::dispatch::{Flow, Handler, Next};
use crate::http::{Request, Response};

/// Marker attached to requests that passed [`BearerAuth`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated;

/// Chain-local guard comparing `Authorization: Bearer <token>`.
#[derive(Clone, Debug)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl Handler for BearerAuth {
    fn call(&self, res: &mut Response, req: &mut Request, next: Next) -> Flow {
        let presented = req
            .header(header::AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer "));

        if presented == Some(self.token.as_str()) {
            req.extensions_mut().insert(Authenticated);
            return next.run();
        }

        tracing::warn!(path = %req.path(), "Rejected unauthenticated request");
        res.status(StatusCode::UNAUTHORIZED)
            .header(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))
            .send("Unauthorized");
        next.halt()
    }
}
