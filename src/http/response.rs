//! Response sink handed to every handler.
//!
//! # Responsibilities
//! - Accumulate status, headers and body written by the handler chain
//! - Hand the accumulated parts to the transport adapter once dispatch ends
//!
//! # Design Decisions
//! - Nothing is flushed until dispatch completes
//! - Writes append; a short-circuiting handler keeps whatever it wrote

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Buffered response written by handlers.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Set the status code.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Set a header, replacing any previous value.
    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append raw bytes to the body.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.body.extend_from_slice(bytes.as_ref());
        self
    }

    /// Append text to the body, defaulting the content type to plain text.
    pub fn send(&mut self, text: impl AsRef<str>) -> &mut Self {
        if !self.headers.contains_key(header::CONTENT_TYPE) {
            self.headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        }
        self.write(text.as_ref().as_bytes())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, lossy. Mostly useful in tests and logs.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_sets_plain_text_once() {
        let mut res = Response::new();
        res.status(StatusCode::CREATED).send("a").send("b");

        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.body_text(), "ab");
        assert_eq!(res.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
    }

    #[test]
    fn test_send_keeps_explicit_content_type() {
        let mut res = Response::new();
        res.header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"))
            .send("<p>hi</p>");
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html");
    }

    #[test]
    fn test_defaults() {
        let res = Response::default();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.is_empty());
        assert!(res.headers().is_empty());
    }
}
