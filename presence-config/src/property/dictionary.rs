use serde_json::Value;

use super::section::AnySection;
use super::Property;
use crate::error::{Error, Result};
use crate::schema::{ButtonMap, ModuleMap, TextMap, DEFAULT_KEY};

/// A string-keyed configuration dictionary.
///
/// Backed by persistent maps: [`Dictionary::with_entry`] and
/// [`Dictionary::merge_missing`] return new dictionaries that share
/// structure with the old one, so a dictionary obtained through a getter is
/// never mutated behind its owner's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dictionary {
    /// Plain string values.
    Text(TextMap),
    /// Module override values.
    Modules(ModuleMap),
    /// Button values.
    Buttons(ButtonMap),
}

impl Dictionary {
    /// Name of the entry kind, for diagnostics.
    #[must_use]
    pub fn entry_kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Modules(_) => "module",
            Self::Buttons(_) => "button",
        }
    }

    /// Looks up one entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Property> {
        match self {
            Self::Text(map) => map.get(key).cloned().map(Property::Text),
            Self::Modules(map) => map
                .get(key)
                .cloned()
                .map(|m| Property::Section(AnySection::Module(m))),
            Self::Buttons(map) => map
                .get(key)
                .cloned()
                .map(|b| Property::Section(AnySection::Button(b))),
        }
    }

    /// True when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Self::Text(map) => map.contains_key(key),
            Self::Modules(map) => map.contains_key(key),
            Self::Buttons(map) => map.contains_key(key),
        }
    }

    /// True when the reserved `default` entry is present.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.contains_key(DEFAULT_KEY)
    }

    /// Keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Text(map) => map.keys().cloned().collect(),
            Self::Modules(map) => map.keys().cloned().collect(),
            Self::Buttons(map) => map.keys().cloned().collect(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(map) => map.len(),
            Self::Modules(map) => map.len(),
            Self::Buttons(map) => map.len(),
        }
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy with `key` inserted or overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when `value` is not of this
    /// dictionary's entry kind.
    pub fn with_entry(&self, key: &str, value: Property) -> Result<Self> {
        let key = key.to_string();
        match (self, value) {
            (Self::Text(map), Property::Text(text)) => Ok(Self::Text(map.update(key, text))),
            (Self::Modules(map), Property::Section(AnySection::Module(module))) => {
                Ok(Self::Modules(map.update(key, module)))
            }
            (Self::Buttons(map), Property::Section(AnySection::Button(button))) => {
                Ok(Self::Buttons(map.update(key, button)))
            }
            (_, value) => Err(Error::TypeMismatch {
                path: key,
                expected: self.entry_kind().to_string(),
                found: value.kind_name().to_string(),
            }),
        }
    }

    /// Returns a copy holding every entry of `self` plus the entries of
    /// `defaults` whose keys `self` lacks.
    ///
    /// Entries already present keep their values. Dictionaries of different
    /// entry kinds do not merge and `self` is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use im::OrdMap;
    /// use presence_config::property::Dictionary;
    ///
    /// let user = Dictionary::Text(OrdMap::unit("pack".to_string(), "mine".to_string()));
    /// let defaults = Dictionary::Text(
    ///     [("default", "d"), ("pack", "theirs")]
    ///         .into_iter()
    ///         .map(|(k, v)| (k.to_string(), v.to_string()))
    ///         .collect(),
    /// );
    /// let merged = user.merge_missing(&defaults);
    /// assert_eq!(merged.keys(), vec!["default", "pack"]);
    /// assert_eq!(merged.get("pack").unwrap().as_text(), Some("mine"));
    /// ```
    #[must_use]
    pub fn merge_missing(&self, defaults: &Self) -> Self {
        match (self, defaults) {
            (Self::Text(user), Self::Text(base)) => Self::Text(user.clone().union(base.clone())),
            (Self::Modules(user), Self::Modules(base)) => {
                Self::Modules(user.clone().union(base.clone()))
            }
            (Self::Buttons(user), Self::Buttons(base)) => {
                Self::Buttons(user.clone().union(base.clone()))
            }
            _ => self.clone(),
        }
    }

    /// Decodes a raw object into a dictionary of the same entry kind.
    pub(crate) fn decode_like(&self, raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        match self {
            Self::Text(_) => raw.as_object().map(|entries| {
                Self::Text(
                    entries
                        .iter()
                        .filter_map(|(key, value)| {
                            crate::schema::lenient::scalar_text(value).map(|v| (key.clone(), v))
                        })
                        .collect(),
                )
            }),
            Self::Modules(_) => serde_json::from_value(raw.clone()).ok().map(Self::Modules),
            Self::Buttons(_) => serde_json::from_value(raw.clone()).ok().map(Self::Buttons),
        }
    }

    /// Serializes the dictionary.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(map) => serde_json::to_value(map),
            Self::Modules(map) => serde_json::to_value(map),
            Self::Buttons(map) => serde_json::to_value(map),
        }
        .unwrap_or(Value::Null)
    }
}
