//! Request view handed to every handler.
//!
//! # Responsibilities
//! - Expose method, path, query, headers and body of the inbound request
//! - Carry the captured path parameters once a route matched
//! - Expose the frozen application properties
//! - Hold a typed per-request property bag (`Extensions`)
//!
//! # Design Decisions
//! - Created fresh for every request and owned by that request's task
//! - Parameters are attached by the dispatcher, never by handlers

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{Extensions, HeaderMap, Method};
use serde_json::Value;

use crate::dispatch::Properties;
use crate::routing::Params;

/// Per-request view of the inbound HTTP request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    properties: Arc<Properties>,
    extensions: Extensions,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::new(),
            properties: Arc::default(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(str::to_string);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path as received, still percent-encoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Captured path parameters, percent-decoded. Empty before matching.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Shorthand for `properties().get(key)`.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub(crate) fn set_properties(&mut self, properties: Arc<Properties>) {
        self.properties = properties;
    }

    /// Request-scoped property bag.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_builder_and_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert("x-token", HeaderValue::from_static("abc"));

        let req = Request::new(Method::POST, "/items")
            .with_query(Some("page=2"))
            .with_headers(headers)
            .with_body(Bytes::from_static(b"payload"));

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/items");
        assert_eq!(req.query(), Some("page=2"));
        assert_eq!(req.header("x-token"), Some("abc"));
        assert_eq!(req.header("missing"), None);
        assert_eq!(req.body().as_ref(), b"payload");
        assert!(req.params().is_empty());
        assert!(req.properties().is_empty());
    }

    #[test]
    fn test_extensions_are_request_scoped() {
        #[derive(Clone, Debug, PartialEq)]
        struct UserId(u32);

        let mut req = Request::new(Method::GET, "/");
        req.extensions_mut().insert(UserId(7));
        assert_eq!(req.extensions().get::<UserId>(), Some(&UserId(7)));

        let other = Request::new(Method::GET, "/");
        assert!(other.extensions().get::<UserId>().is_none());
    }
}
