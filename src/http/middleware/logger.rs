//! Request logging middleware.

use crate::dispatch::{Flow, Handler, Next};
use crate::http::{Request, Response};

/// Global middleware that logs every inbound request. Always continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl Handler for RequestLogger {
    fn call(&self, _res: &mut Response, req: &mut Request, next: Next) -> Flow {
        tracing::debug!(
            method = %req.method(),
            path = %req.path(),
            request_id = req.header("x-request-id").unwrap_or("unknown"),
            "Dispatching request"
        );
        next.run()
    }
}
