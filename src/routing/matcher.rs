//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile `/literal/:param/*rest` strings into segment sequences
//! - Reject malformed patterns at registration time
//! - Match a request path against a compiled pattern, capturing parameters
//!
//! # Design Decisions
//! - Literal matching is case-sensitive
//! - Trailing slashes are stripped on both sides; the empty path is `/`
//! - No backtracking and no regex: one linear walk per pattern
//! - A wildcard captures the unconsumed suffix, including the empty suffix
//! - Request paths arrive percent-encoded; each segment is decoded after
//!   splitting, so an encoded `%2F` never creates an extra segment

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;

use crate::routing::error::{PatternErrorKind, RouteError};
use crate::routing::params::Params;

/// Marker that starts a named parameter segment.
pub const PARAM_MARKER: char = ':';

/// Marker that starts a trailing wildcard segment.
pub const WILDCARD_MARKER: char = '*';

/// Capture key used by a bare `*` segment.
pub const WILDCARD_KEY: &str = "*";

/// One slash-delimited component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Param(String),
    /// Always the final segment. Holds the capture key.
    Wildcard(String),
}

impl Segment {
    fn capture_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::Wildcard(name) => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, "{PARAM_MARKER}{name}"),
            Segment::Wildcard(name) if name == WILDCARD_KEY => write!(f, "{WILDCARD_MARKER}"),
            Segment::Wildcard(name) => write!(f, "{WILDCARD_MARKER}{name}"),
        }
    }
}

/// Compiled, matchable form of a registration path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a registration path into segments.
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        let body = path_body(pattern);
        let mut segments = Vec::new();
        if body.is_empty() {
            return Ok(Self { segments });
        }

        let tokens: Vec<&str> = body.split('/').collect();
        let last = tokens.len() - 1;
        let mut seen = HashSet::new();

        for (index, token) in tokens.into_iter().enumerate() {
            let segment = if let Some(name) = token.strip_prefix(WILDCARD_MARKER) {
                if index != last {
                    return Err(RouteError::invalid(pattern, PatternErrorKind::MisplacedWildcard));
                }
                let key = if name.is_empty() { WILDCARD_KEY } else { name };
                Segment::Wildcard(key.to_string())
            } else if let Some(name) = token.strip_prefix(PARAM_MARKER) {
                if name.is_empty() {
                    return Err(RouteError::invalid(pattern, PatternErrorKind::EmptyParamName));
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(token.to_string())
            };

            if let Some(name) = segment.capture_name() {
                if !seen.insert(name.to_string()) {
                    return Err(RouteError::invalid(
                        pattern,
                        PatternErrorKind::DuplicateParam(name.to_string()),
                    ));
                }
            }
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    /// Build a pattern made only of literal segments.
    ///
    /// Markers inside `prefix` are not interpreted.
    pub fn literal(prefix: &str) -> Self {
        let body = path_body(prefix);
        let segments = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').map(|s| Segment::Literal(s.to_string())).collect()
        };
        Self { segments }
    }

    /// Return a copy of this pattern with `prefix` prepended.
    pub fn prefixed(&self, prefix: &RoutePattern) -> Self {
        let mut segments = Vec::with_capacity(prefix.segments.len() + self.segments.len());
        segments.extend(prefix.segments.iter().cloned());
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Walk the pattern and the raw request `path` in lockstep.
    ///
    /// Returns the captured parameters on a structural match. Literals are
    /// compared and values captured after percent-decoding.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let body = path_body(path);
        let mut remaining = (!body.is_empty()).then_some(body);
        let mut params = Params::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Wildcard(key) => {
                    params.insert(key.as_str(), decode(remaining.unwrap_or("")));
                    return Some(params);
                }
                Segment::Literal(text) => {
                    let (head, tail) = split_first(remaining?);
                    if decode(head) != text.as_str() {
                        return None;
                    }
                    remaining = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = split_first(remaining?);
                    params.insert(name.as_str(), decode(head));
                    remaining = tail;
                }
            }
        }

        remaining.is_none().then_some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for RoutePattern {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Strip trailing slashes; the empty path collapses to `/`.
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

// Normalized path without its leading slash. Empty for the root.
fn path_body(path: &str) -> &str {
    let normalized = normalize(path);
    normalized.strip_prefix('/').unwrap_or(normalized)
}

fn decode(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> RoutePattern {
        RoutePattern::compile(s).unwrap()
    }

    #[test]
    fn test_compile_segments() {
        let p = pattern("/users/:id/files/*rest");
        assert_eq!(
            p.segments(),
            &[
                Segment::Literal("users".into()),
                Segment::Param("id".into()),
                Segment::Literal("files".into()),
                Segment::Wildcard("rest".into()),
            ]
        );
        assert!(p.has_wildcard());
        assert_eq!(p.to_string(), "/users/:id/files/*rest");
    }

    #[test]
    fn test_compile_normalizes_trailing_slash() {
        assert_eq!(pattern("/users/"), pattern("/users"));
        assert_eq!(pattern(""), pattern("/"));
        assert!(pattern("/").segments().is_empty());
    }

    #[test]
    fn test_compile_rejects_misplaced_wildcard() {
        let err = RoutePattern::compile("/files/*rest/more").unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidPattern {
                pattern: "/files/*rest/more".into(),
                reason: PatternErrorKind::MisplacedWildcard,
            }
        );
    }

    #[test]
    fn test_compile_rejects_bad_param_names() {
        let empty = RoutePattern::compile("/users/:").unwrap_err();
        assert!(matches!(
            empty,
            RouteError::InvalidPattern { reason: PatternErrorKind::EmptyParamName, .. }
        ));

        let dup = RoutePattern::compile("/a/:id/b/:id").unwrap_err();
        assert!(matches!(
            dup,
            RouteError::InvalidPattern { reason: PatternErrorKind::DuplicateParam(ref n), .. } if n == "id"
        ));

        let dup_wildcard = RoutePattern::compile("/a/:rest/*rest");
        assert!(dup_wildcard.is_err());
    }

    #[test]
    fn test_literal_match_is_exact() {
        let p = pattern("/about/team");
        assert_eq!(p.match_path("/about/team"), Some(Params::new()));
        assert_eq!(p.match_path("/about/team/"), Some(Params::new()));
        assert_eq!(p.match_path("/About/team"), None);
        assert_eq!(p.match_path("/about"), None);
        assert_eq!(p.match_path("/about/team/x"), None);
    }

    #[test]
    fn test_root_match() {
        let p = pattern("/");
        assert!(p.match_path("/").is_some());
        assert!(p.match_path("").is_some());
        assert!(p.match_path("/x").is_none());
    }

    #[test]
    fn test_param_capture() {
        let params = pattern("/users/:id").match_path("/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_param_captures_empty_segment() {
        let params = pattern("/a/:x/b").match_path("/a//b").unwrap();
        assert_eq!(params.get("x"), Some(""));
    }

    #[test]
    fn test_wildcard_captures_suffix() {
        let p = pattern("/files/*rest");
        let params = p.match_path("/files/a/b/c").unwrap();
        assert_eq!(params.get("rest"), Some("a/b/c"));

        let empty = p.match_path("/files").unwrap();
        assert_eq!(empty.get("rest"), Some(""));

        assert!(p.match_path("/other/a").is_none());
    }

    #[test]
    fn test_bare_wildcard_uses_reserved_key() {
        let params = pattern("/static/*").match_path("/static/css/site.css").unwrap();
        assert_eq!(params.get(WILDCARD_KEY), Some("css/site.css"));
    }

    #[test]
    fn test_literal_prefix_ignores_markers() {
        let prefix = RoutePattern::literal("/:tenant/");
        assert_eq!(prefix.segments(), &[Segment::Literal(":tenant".into())]);

        let p = pattern("/ping").prefixed(&prefix);
        assert!(p.match_path("/:tenant/ping").is_some());
        assert!(p.match_path("/acme/ping").is_none());
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        let params = pattern("/users/:id").match_path("/users/john%20doe").unwrap();
        assert_eq!(params.get("id"), Some("john doe"));

        assert!(pattern("/caf\u{e9}").match_path("/caf%C3%A9").is_some());
    }

    #[test]
    fn test_encoded_slash_stays_in_one_segment() {
        let p = pattern("/files/:name");
        let params = p.match_path("/files/a%2Fb").unwrap();
        assert_eq!(params.get("name"), Some("a/b"));
        assert!(p.match_path("/files/a/b").is_none());

        let rest = pattern("/static/*rest").match_path("/static/css/a%20b.css").unwrap();
        assert_eq!(rest.get("rest"), Some("css/a b.css"));
    }

    #[test]
    fn test_match_is_idempotent() {
        let p = pattern("/users/:id/*rest");
        let first = p.match_path("/users/7/a/b");
        let second = p.match_path("/users/7/a/b");
        assert_eq!(first, second);
    }
}
