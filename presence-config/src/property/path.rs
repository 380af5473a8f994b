use std::fmt;

use super::{AnySection, Property, Section, SectionKind};
use crate::error::{Error, Result};
use crate::schema::ConfigGraph;

/// A sequence of document keys from the graph root to one value.
///
/// Segments are kept separately, so dictionary keys containing dots (server
/// addresses, for example) stay intact.
///
/// # Examples
///
/// ```
/// use presence_config::PropertyPath;
///
/// let path = PropertyPath::parse("accessibilitySettings.configKeyCode");
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.last(), Some("configKeyCode"));
/// assert_eq!(path.parent().unwrap().to_string(), "accessibilitySettings");
/// assert!(PropertyPath::root().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    /// The empty path, naming the root.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from its segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Splits a dotted path. An empty string is the root.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            Self::root()
        } else {
            Self::from_segments(dotted.split('.'))
        }
    }

    /// The segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Alias of [`PropertyPath::is_root`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// This path extended by one segment.
    #[must_use]
    pub fn join(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// The path without its last segment; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    /// The final segment.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Case-insensitive substring test against the dotted form.
    #[must_use]
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.to_string()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for PropertyPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

/// The kind of container a resolved value was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The path is the root itself.
    Root,
    /// A section or value object of the given kind.
    Section(SectionKind),
    /// A dictionary with the given entry kind.
    Dictionary(&'static str),
}

/// A resolved value together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// The value.
    pub value: Property,
    /// The immediate container.
    pub container: Container,
    /// Final path segment; empty for the root.
    pub key: String,
}

impl ConfigGraph {
    /// Resolves `path` and reports the immediate container.
    #[must_use]
    pub fn lookup(&self, path: &PropertyPath) -> Option<Lookup> {
        let Some((key, parent)) = path.segments().split_last() else {
            return Some(Lookup {
                value: self.get(path)?,
                container: Container::Root,
                key: String::new(),
            });
        };
        let parent = self.get(&PropertyPath(parent.to_vec()))?;
        let container = match &parent {
            Property::Section(section) => Container::Section(section.kind()),
            Property::Dictionary(dictionary) => Container::Dictionary(dictionary.entry_kind()),
            _ => return None,
        };
        Some(Lookup {
            value: parent.child(key)?,
            container,
            key: key.clone(),
        })
    }

    /// Reads the value at `path`; the root path yields a copy of the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::{ConfigGraph, Property, PropertyPath};
    ///
    /// let graph = ConfigGraph::defaults(765);
    /// let path = PropertyPath::parse("accessibilitySettings.configKeyCode");
    /// assert_eq!(graph.get(&path), Some(Property::Int(96)));
    /// assert_eq!(graph.get(&PropertyPath::parse("biomeSettings.biomeData.nope")), None);
    /// ```
    #[must_use]
    pub fn get(&self, path: &PropertyPath) -> Option<Property> {
        match path.segments().split_first() {
            None => Some(Property::Section(AnySection::Config(Box::new(self.clone())))),
            Some((first, rest)) => rest
                .iter()
                .try_fold(self.property(first)?, |node, key| node.child(key)),
        }
    }

    /// Writes `value` at `path`.
    ///
    /// A missing final dictionary key is inserted. Every container along the
    /// path is replaced by an updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] when an intermediate segment does
    /// not resolve, [`Error::TypeMismatch`] when `value` has the wrong kind
    /// for its slot, and [`Error::Validation`] for the root path.
    pub fn set(&mut self, path: &PropertyPath, value: Property) -> Result<()> {
        let Some((first, rest)) = path.segments().split_first() else {
            return Err(Error::Validation {
                field: "path".to_string(),
                message: "the document root cannot be replaced".to_string(),
            });
        };
        let result = if rest.is_empty() {
            self.set_property(first, value)
        } else {
            match self.property(first) {
                Some(mut child) => child
                    .set_path(rest, value)
                    .and_then(|()| self.set_property(first, child)),
                None => Err(Error::PropertyNotFound {
                    path: first.clone(),
                }),
            }
        };
        result.map_err(|err| match err {
            Error::PropertyNotFound { .. } => Error::PropertyNotFound {
                path: path.to_string(),
            },
            Error::TypeMismatch {
                expected, found, ..
            } => Error::TypeMismatch {
                path: path.to_string(),
                expected,
                found,
            },
            other => other,
        })
    }

    /// Overwrites the value at `path` with its counterpart in `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] when `defaults` has no value at
    /// `path`, plus any error of [`ConfigGraph::set`].
    pub fn reset(&mut self, path: &PropertyPath, defaults: &ConfigGraph) -> Result<()> {
        let value = defaults.get(path).ok_or_else(|| Error::PropertyNotFound {
            path: path.to_string(),
        })?;
        self.set(path, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ModuleData, DEFAULT_KEY};

    fn path(dotted: &str) -> PropertyPath {
        PropertyPath::parse(dotted)
    }

    #[test]
    fn test_get_scalars_and_nested() {
        let graph = ConfigGraph::defaults(765);
        assert_eq!(
            graph.get(&path("generalSettings.defaultIcon")),
            Some(Property::from("grass"))
        );
        assert_eq!(
            graph.get(&path("advancedSettings.guiSettings.fallbackGuiIcon")),
            Some(Property::from("unknown"))
        );
        assert_eq!(
            graph.get(&path("accessibilitySettings.tooltipBorder.end.red")),
            Some(Property::Int(40))
        );
    }

    #[test]
    fn test_get_root_and_missing() {
        let graph = ConfigGraph::default();
        assert!(matches!(
            graph.get(&PropertyPath::root()),
            Some(Property::Section(AnySection::Config(_)))
        ));
        assert_eq!(graph.get(&path("generalSettings.nope")), None);
        assert_eq!(graph.get(&path("nope.deeper")), None);
        // Unset optional leaves do not resolve
        assert_eq!(
            graph.get(&path("statusMessages.mainMenuData.iconOverride")),
            None
        );
    }

    #[test]
    fn test_set_scalar() {
        let mut graph = ConfigGraph::default();
        graph
            .set(&path("advancedSettings.refreshRate"), Property::Int(9))
            .unwrap();
        assert_eq!(graph.advanced_settings.refresh_rate, 9);
    }

    #[test]
    fn test_set_inside_dictionary_entry() {
        let mut graph = ConfigGraph::default();
        let before = graph.biome_settings.biome_data.clone();
        graph
            .set(
                &path("biomeSettings.biomeData.default.iconOverride"),
                Property::from("plains"),
            )
            .unwrap();
        assert_eq!(
            graph.biome_settings.biome_data[DEFAULT_KEY]
                .icon_override
                .as_deref(),
            Some("plains")
        );
        // The map read before the write is unchanged
        assert_eq!(before[DEFAULT_KEY].icon_override, None);
    }

    #[test]
    fn test_set_inserts_missing_dictionary_key() {
        let mut graph = ConfigGraph::default();
        let key = PropertyPath::from_segments(["serverSettings", "serverData", "mc.example.net"]);
        assert_eq!(graph.get(&key), None);
        graph
            .set(
                &key,
                Property::Section(AnySection::Module(ModuleData::with_text("hi"))),
            )
            .unwrap();
        assert!(graph.server_settings.server_data.contains_key("mc.example.net"));
    }

    #[test]
    fn test_set_errors_name_full_path() {
        let mut graph = ConfigGraph::default();
        let err = graph
            .set(&path("advancedSettings.refreshRate"), Property::from("fast"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch at 'advancedSettings.refreshRate': expected integer, found string"
        );
        let err = graph
            .set(&path("advancedSettings.nope.deeper"), Property::Int(1))
            .unwrap_err();
        assert!(matches!(err, Error::PropertyNotFound { ref path } if path == "advancedSettings.nope.deeper"));
        assert!(graph.set(&PropertyPath::root(), Property::Int(1)).is_err());
    }

    #[test]
    fn test_reset_copies_default() {
        let defaults = ConfigGraph::defaults(765);
        let mut graph = ConfigGraph::defaults(765);
        graph.accessibility_settings.config_key_code = 5;
        graph
            .reset(&path("accessibilitySettings.configKeyCode"), &defaults)
            .unwrap();
        assert_eq!(graph.accessibility_settings.config_key_code, 96);
    }

    #[test]
    fn test_lookup_reports_container() {
        let graph = ConfigGraph::default();
        let found = graph.lookup(&path("displaySettings.dynamicIcons.default")).unwrap();
        assert_eq!(found.container, Container::Dictionary("string"));
        assert_eq!(found.key, "default");

        let found = graph.lookup(&path("generalSettings.clientId")).unwrap();
        assert_eq!(found.container, Container::Section(SectionKind::General));

        let found = graph.lookup(&PropertyPath::root()).unwrap();
        assert_eq!(found.container, Container::Root);
    }

    #[test]
    fn test_path_helpers() {
        let p = PropertyPath::from_segments(["a", "b.c"]);
        assert_eq!(p.to_string(), "a.b.c");
        assert_eq!(p.join("d").len(), 3);
        assert!(p.contains_ignore_case("B.C"));
        assert_eq!(PropertyPath::root().parent(), None);
    }
}
