//! Path-based access to any leaf of the configuration graph.
//!
//! A [`PropertyPath`] is a sequence of document keys. Resolution starts at
//! the [`ConfigGraph`] root and consumes one segment at a time: sections
//! answer through their named-property table, dictionaries through key
//! lookup. A missing segment anywhere makes the whole path unresolved.
//!
//! Writes are copy-on-write. [`ConfigGraph::set`] takes a copy of each
//! container along the path, writes the leaf into the innermost copy and
//! stores the copies back outward, so no map obtained from a getter is ever
//! mutated in place.

mod dictionary;
mod path;
pub(crate) mod section;

use std::fmt;

use serde_json::Value;

pub use dictionary::Dictionary;
pub use path::{Container, Lookup, PropertyPath};
pub use section::{AnySection, Section, SectionKind};

use crate::error::{Error, Result};
use crate::schema::lenient::scalar_text;
use crate::values::{parse_boolean, parse_integer};

/// A value read from or written to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// A boolean leaf.
    Bool(bool),
    /// An integer leaf.
    Int(i32),
    /// A string leaf.
    Text(String),
    /// A nested section or value object.
    Section(AnySection),
    /// A string-keyed dictionary.
    Dictionary(Dictionary),
}

impl Property {
    /// Name of this value's kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Text(_) => "string",
            Self::Section(section) => section.kind().name(),
            Self::Dictionary(_) => "dictionary",
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The section, if this is one.
    #[must_use]
    pub fn as_section(&self) -> Option<&AnySection> {
        match self {
            Self::Section(s) => Some(s),
            _ => None,
        }
    }

    /// The dictionary, if this is one.
    #[must_use]
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Resolves one path segment below this value.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<Property> {
        match self {
            Self::Section(section) => section.property(key),
            Self::Dictionary(dictionary) => dictionary.get(key),
            _ => None,
        }
    }

    fn set_child(&mut self, key: &str, value: Property) -> Result<()> {
        match self {
            Self::Section(section) => section.set_property(key, value),
            Self::Dictionary(dictionary) => {
                *dictionary = dictionary.with_entry(key, value)?;
                Ok(())
            }
            other => Err(Error::TypeMismatch {
                path: key.to_string(),
                expected: "section or dictionary".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    /// Writes `value` at `segments` below this value.
    fn set_path(&mut self, segments: &[String], value: Property) -> Result<()> {
        let Some((first, rest)) = segments.split_first() else {
            *self = value;
            return Ok(());
        };
        if rest.is_empty() {
            return self.set_child(first, value);
        }
        let mut child = self.child(first).ok_or_else(|| Error::PropertyNotFound {
            path: first.clone(),
        })?;
        child.set_path(rest, value)?;
        self.set_child(first, child)
    }

    /// Decodes `raw` into a value of the same kind as `self`.
    ///
    /// Scalars accept their textual forms (`"true"`, `"57"`); sections and
    /// dictionaries decode leniently from objects. Returns `None` when `raw`
    /// cannot represent this kind.
    #[must_use]
    pub fn coerce(&self, raw: &Value) -> Option<Property> {
        match self {
            Self::Bool(_) => match raw {
                Value::Bool(b) => Some(Self::Bool(*b)),
                Value::String(s) => parse_boolean(s.trim()).map(Self::Bool),
                _ => None,
            },
            Self::Int(_) => match raw {
                Value::Number(n) => n
                    .as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .map(Self::Int),
                Value::String(s) => parse_integer(s.trim()).map(Self::Int),
                _ => None,
            },
            Self::Text(_) => scalar_text(raw).map(Self::Text),
            Self::Section(section) => section.decode_like(raw).map(Self::Section),
            Self::Dictionary(dictionary) => dictionary.decode_like(raw).map(Self::Dictionary),
        }
    }

    /// Serializes the value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
            Self::Section(section) => section.to_json(),
            Self::Dictionary(dictionary) => dictionary.to_json(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Dictionary> for Property {
    fn from(value: Dictionary) -> Self {
        Self::Dictionary(value)
    }
}

impl From<AnySection> for Property {
    fn from(value: AnySection) -> Self {
        Self::Section(value)
    }
}
