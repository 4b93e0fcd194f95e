//! Path pattern matching.
//!
//! # Responsibilities
//! - Tokenize a route path into literal and capture segments
//! - Match a fragment path against the tokens, extracting named captures
//! - Render a pattern back into a concrete path for URL building
//!
//! # Design Decisions
//! - Captures span exactly one non-empty segment
//! - Both `:name` and `(?<name>...)` placeholders are accepted; the body of a
//!   `(?<name>...)` placeholder is not interpreted, and a body narrower than
//!   "any segment" is logged at warn and reported by `relaxed_captures`
//! - Literal matching is case-sensitive
//! - No regex: matching is a single pass over the segments

use std::fmt;

use crate::error::RouterError;
use crate::routing::route::RouteParams;

/// Trait for extracting route params from a fragment path.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns the named captures if `path` matches, `None` otherwise.
    fn captures(&self, path: &str) -> Option<RouteParams>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture {
        name: String,
        source: String,
        /// The declared body was narrower than what is actually matched.
        relaxed: bool,
    },
}

/// A tokenized route path such as `/users/:id` or `/users/(?<id>[^/]+)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Tokenize a route path.
    pub fn parse(source: &str) -> Result<Self, RouterError> {
        let body = source.strip_prefix('/').unwrap_or(source);
        let body = body.strip_suffix('/').unwrap_or(body);

        let segments = if body.is_empty() {
            Vec::new()
        } else {
            split_segments(source, body)?
                .into_iter()
                .map(|raw| parse_segment(source, raw))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The path exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the capture placeholders, in declaration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Captures whose `(?<name>...)` body restricts the segment further than
    /// the matcher enforces.
    pub fn relaxed_captures(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture {
                name, relaxed: true, ..
            } => Some(name.as_str()),
            _ => None,
        })
    }

    /// True when the pattern is the bare root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Substitute `params` into the capture placeholders.
    ///
    /// Values are percent-encoded. Placeholders without a value are kept
    /// verbatim and params that name no placeholder are ignored.
    pub fn render(&self, params: &RouteParams) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Capture { name, source, .. } => match params.get(name) {
                    Some(value) => path.push_str(&urlencoding::encode(value)),
                    None => path.push_str(source),
                },
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

impl Matcher for PathPattern {
    fn captures(&self, path: &str) -> Option<RouteParams> {
        let body = path.strip_prefix('/')?;
        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, raw) in self.segments.iter().zip(parts) {
            let decoded = urlencoding::decode(raw)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            match segment {
                Segment::Literal(text) => {
                    if *text != decoded {
                        return None;
                    }
                }
                Segment::Capture { name, .. } => {
                    if decoded.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decoded);
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split on `/`, ignoring slashes nested in `(...)` groups or `[...]` classes.
fn split_segments<'a>(pattern: &str, body: &'a str) -> Result<Vec<&'a str>, RouterError> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid(pattern, "unbalanced ')'"))?;
            }
            '/' if depth == 0 && !in_class => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || in_class {
        return Err(invalid(pattern, "unterminated capture group"));
    }
    segments.push(&body[start..]);
    Ok(segments)
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, RouterError> {
    if let Some(name) = raw.strip_prefix(':') {
        validate_name(pattern, name)?;
        return Ok(Segment::Capture {
            name: name.to_string(),
            source: raw.to_string(),
            relaxed: false,
        });
    }

    if let Some(rest) = raw.strip_prefix("(?<") {
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| invalid(pattern, "capture group must span a whole segment"))?;
        let (name, body) = inner
            .split_once('>')
            .ok_or_else(|| invalid(pattern, "capture group is missing '>'"))?;
        validate_name(pattern, name)?;

        let relaxed = !matches_any_segment(body);
        if relaxed {
            tracing::warn!(
                pattern = %pattern,
                capture = %name,
                body = %body,
                "Capture body is not interpreted, any non-empty segment will match"
            );
        }
        return Ok(Segment::Capture {
            name: name.to_string(),
            source: raw.to_string(),
            relaxed,
        });
    }

    if raw.contains("(?<") {
        return Err(invalid(pattern, "capture group must span a whole segment"));
    }

    Ok(Segment::Literal(raw.to_string()))
}

/// Bodies that accept any single segment, so ignoring them loses nothing.
fn matches_any_segment(body: &str) -> bool {
    matches!(body, "[^/]+" | "[^/]*" | ".+" | ".*" | ".+?" | ".*?")
}

fn validate_name(pattern: &str, name: &str) -> Result<(), RouterError> {
    if name.is_empty() {
        return Err(invalid(pattern, "capture name is empty"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(pattern, &format!("capture name {name:?} is not an identifier")));
    }
    Ok(())
}

fn invalid(pattern: &str, reason: &str) -> RouterError {
    RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
