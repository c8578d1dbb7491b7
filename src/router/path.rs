//! Express-style path patterns (`/things/:id`).

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route path.
///
/// Empty segments are dropped, so `/things/` and `/things` are the same
/// pattern and `/` is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        if !path.starts_with('/') {
            return Err(invalid("path must start with '/'"));
        }

        let mut segments = Vec::new();
        for raw in split(path) {
            let segment = match raw.strip_prefix(':') {
                Some("") => return Err(invalid("empty parameter name")),
                Some(name) => {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                    {
                        return Err(invalid("duplicate parameter name"));
                    }
                    Segment::Param(name.to_string())
                }
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    /// `prefix` followed by `self`.
    pub fn join(prefix: &PathPattern, rest: &PathPattern) -> Result<Self, RouteError> {
        let joined = Self {
            segments: prefix
                .segments
                .iter()
                .chain(rest.segments.iter())
                .cloned()
                .collect(),
        };
        // Re-parse to catch a parameter name used on both sides.
        Self::parse(&joined.to_string())
    }

    /// Names of the path parameters, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Do both patterns match exactly the same paths?
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Match a concrete request path, returning the captured parameters.
    ///
    /// Captured values are percent-decoded. A segment that does not decode
    /// to UTF-8 is kept as it was sent.
    pub fn matches(&self, path: &str) -> Option<Map<String, Value>> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Map::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.insert(name.clone(), Value::String(value));
                }
            }
        }
        Some(params)
    }

    /// Order two patterns by specificity: a literal segment beats a
    /// parameter, compared left to right.
    pub fn specificity(&self, other: &PathPattern) -> Ordering {
        let rank = |s: &Segment| matches!(s, Segment::Literal(_));
        self.segments
            .iter()
            .map(rank)
            .cmp(other.segments.iter().map(rank))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => write!(f, "/{}", literal)?,
                Segment::Param(name) => write!(f, "/:{}", name)?,
            }
        }
        Ok(())
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
