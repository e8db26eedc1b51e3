//! Absolute hierarchical paths.

use crate::error::GraphError;
use crate::name::Name;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// One step of a path: a child name plus its same-name-sibling index.
///
/// Indexes are 1-based. Index 1 is implied and omitted from the text form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    name: Name,
    index: u32,
}

impl Segment {
    /// First (or only) child with the given name.
    pub fn named(name: Name) -> Self {
        Self { name, index: 1 }
    }

    /// The `index`-th same-name sibling.
    pub fn new(name: Name, index: u32) -> Result<Self, GraphError> {
        if index == 0 {
            return Err(GraphError::invalid_path(
                format!("{name}[0]"),
                "sibling indexes start at 1",
            ));
        }
        Ok(Self { name, index })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether the index is explicit in the text form.
    pub fn has_index(&self) -> bool {
        self.index > 1
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_index() {
            write!(f, "{}[{}]", self.name, self.index)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An absolute path from the workspace root to a node.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    segments: Vec<Segment>,
}

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<name>.+?)(?:\[(?P<index>[0-9]+)\])?$")
            .expect("path segment regex must compile")
    })
}

impl Path {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `/a/b[2]/{urn:x}c`.
    ///
    /// Slashes inside a `{namespace}` are part of the name, not separators.
    pub fn parse(input: &str) -> Result<Self, GraphError> {
        let body = input
            .strip_prefix('/')
            .ok_or_else(|| GraphError::invalid_path(input, "path must be absolute"))?;
        if body.is_empty() {
            return Ok(Self::root());
        }

        let parts = split_segments(body)
            .ok_or_else(|| GraphError::invalid_path(input, "unbalanced namespace braces"))?;

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            if part.is_empty() {
                return Err(GraphError::invalid_path(input, "empty segment"));
            }
            let caps = segment_re()
                .captures(part)
                .ok_or_else(|| GraphError::invalid_path(input, format!("bad segment {part:?}")))?;
            let name = Name::parse(&caps["name"]).map_err(|err| {
                GraphError::invalid_path(input, format!("bad segment {part:?}: {err}"))
            })?;
            let segment = match caps.name("index") {
                Some(raw) => {
                    let index: u32 = raw.as_str().parse().map_err(|_| {
                        GraphError::invalid_path(input, format!("bad sibling index in {part:?}"))
                    })?;
                    Segment::new(name, index)
                        .map_err(|_| GraphError::invalid_path(input, "sibling indexes start at 1"))?
                }
                None => Segment::named(name),
            };
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self {
            segments: head.to_vec(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments; zero at the root.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

fn split_segments(body: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.checked_sub(1)?,
            '/' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&body[start..]);
    Some(parts)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}
