//! Typed property values.

use crate::name::Name;
use crate::path::Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Reference to another node by identifier.
    Reference(Uuid),
    Name(Name),
    Path(Path),
}

impl Value {
    /// Short lowercase type label, as used in the serialized tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Reference(_) => "reference",
            Value::Name(_) => "name",
            Value::Path(_) => "path",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Reference(id) => write!(f, "{id}"),
            Value::Name(name) => write!(f, "{name}"),
            Value::Path(path) => write!(f, "{path}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Reference(value)
    }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Value::Name(value)
    }
}

impl From<Path> for Value {
    fn from(value: Path) -> Self {
        Value::Path(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_form_is_tagged() {
        let json = serde_json::to_value(Value::from(42_i64)).expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "long", "value": 42}));
        assert_eq!(Value::from(42_i64).type_name(), "long");
    }

    #[test]
    fn strings_display_quoted() {
        assert_eq!(Value::from("hi").to_string(), r#""hi""#);
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
