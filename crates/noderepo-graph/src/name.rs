//! Namespace-qualified names for nodes and properties.

use crate::error::GraphError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// A namespace-qualified name.
///
/// Both parts are reference-counted, so clones are cheap and names can be
/// handed around like interned symbols. The canonical text form is
/// `{namespace}local`, or just `local` in the default (empty) namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    namespace: Arc<str>,
    local: Arc<str>,
}

fn local_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^/\[\]{}\s](?:[^/\[\]{}]*[^/\[\]{}\s])?$")
            .expect("local name regex must compile")
    })
}

impl Name {
    /// Build a name from a namespace URI and a local part.
    pub fn new(namespace: impl AsRef<str>, local: impl AsRef<str>) -> Result<Self, GraphError> {
        let namespace = namespace.as_ref();
        let local = local.as_ref();
        if namespace.contains(['{', '}']) {
            return Err(GraphError::invalid_name(
                format!("{{{namespace}}}{local}"),
                "namespace must not contain braces",
            ));
        }
        if !local_name_re().is_match(local) {
            return Err(GraphError::invalid_name(
                local,
                "local name must be non-empty without surrounding whitespace or '/', '[', ']', '{', '}'",
            ));
        }
        Ok(Self {
            namespace: Arc::from(namespace),
            local: Arc::from(local),
        })
    }

    /// A name in the default (empty) namespace.
    pub fn local(local: impl AsRef<str>) -> Result<Self, GraphError> {
        Self::new("", local)
    }

    /// Parse the canonical `{namespace}local` or bare `local` form.
    pub fn parse(input: &str) -> Result<Self, GraphError> {
        match input.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local) = rest
                    .split_once('}')
                    .ok_or_else(|| GraphError::invalid_name(input, "unterminated namespace"))?;
                Self::new(namespace, local)
            }
            None => Self::local(input),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl FromStr for Name {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Name {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}
