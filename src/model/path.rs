//! Resource and field paths
//!
//! A [`ResourcePath`] addresses collections and documents
//! (`rooms/r1/messages/m1`). A [`FieldPath`] addresses a value inside a
//! document body (`author.name`), with the reserved `__name__` path standing
//! for the document key itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved field path segment that refers to the document key.
pub const KEY_FIELD_NAME: &str = "__name__";

/// Slash-separated path to a collection or a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The empty (root) path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `a/b/c`; empty segments (leading, trailing or doubled slashes)
    /// are dropped.
    pub fn from_string(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns a new path with `segment` appended.
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns the parent path (the empty path stays empty).
    pub fn pop_last(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Returns true if every segment of `self` is a leading segment of `other`.
    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        self.len() <= other.len() && other.segments.starts_with(&self.segments)
    }

    /// Returns true if `other` is exactly one segment below `self`.
    pub fn is_immediate_parent_of(&self, other: &ResourcePath) -> bool {
        self.len() + 1 == other.len() && self.is_prefix_of(other)
    }

    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// Dot-separated path to a value inside a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses `a.b.c`. No escaping is interpreted; use
    /// [`FieldPath::from_segments`] for segments containing dots.
    pub fn from_dot_separated(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The path that orders and filters by document key.
    pub fn key_field_path() -> Self {
        Self {
            segments: vec![KEY_FIELD_NAME.to_owned()],
        }
    }

    pub fn is_key_field_path(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == KEY_FIELD_NAME
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dot-joined form; segments that are not plain identifiers are quoted
    /// with backticks so distinct paths never share a canonical string.
    pub fn canonical_string(&self) -> String {
        self.segments
            .iter()
            .map(|s| escape_segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape_segment(segment: &str) -> String {
    if is_identifier(segment) {
        return segment.to_owned();
    }
    let mut escaped = String::with_capacity(segment.len() + 2);
    escaped.push('`');
    for c in segment.chars() {
        if c == '\\' || c == '`' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('`');
    escaped
}
