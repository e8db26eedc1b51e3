//! Named, possibly multi-valued node attributes.

use crate::name::Name;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable name plus its ordered values.
///
/// A property with no values is meaningful in updates: it asks the store to
/// remove the property from the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    name: Name,
    #[serde(default)]
    values: Vec<Value>,
}

impl Property {
    pub fn new<V: Into<Value>>(name: Name, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(name: Name, value: impl Into<Value>) -> Self {
        Self {
            name,
            values: vec![value.into()],
        }
    }

    /// A valueless property; in an update this removes the property.
    pub fn empty(name: Name) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn first_value(&self) -> Option<&Value> {
        self.values.first()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.values.len() == 1
    }

    pub fn is_multiple(&self) -> bool {
        self.values.len() > 1
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=[", self.name)?;
        for (idx, value) in self.values.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}
