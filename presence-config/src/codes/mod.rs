//! Bidirectional code tables for epoch-sensitive values.
//!
//! Some stored values change meaning when the host environment crosses a
//! version threshold: input keycodes switch numbering schemes, locale ids
//! switch casing. A [`CodeTable`] holds the fixed `(legacy, modern, name)`
//! triples for one family and converts between the two namespaces.

pub mod keycodes;
pub mod locale;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

pub use keycodes::{convert_key, keycodes, KEYCODE_EPOCH};
pub use locale::{convert_locale, locales, LOCALE_EPOCH};

/// Direction in which stored epoch-sensitive values must be moved.
///
/// # Examples
///
/// ```
/// use presence_config::ConversionMode;
///
/// assert_eq!(ConversionMode::between(340, 400, 341), ConversionMode::ToModern);
/// assert_eq!(ConversionMode::between(400, 340, 341), ConversionMode::ToLegacy);
/// assert_eq!(ConversionMode::between(400, 765, 341), ConversionMode::Verify);
/// assert_eq!(ConversionMode::between(400, -1, 341), ConversionMode::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionMode {
    /// Stored values predate the threshold; the host is at or past it.
    ToModern,
    /// Stored values are past the threshold; the host predates it.
    ToLegacy,
    /// Both sides are in the same epoch; values are only validated.
    Verify,
    /// No comparison was possible.
    Unknown,
}

impl ConversionMode {
    /// Computes the mode for a move from `old` to `new` host versions.
    #[must_use]
    pub fn between(old: i32, new: i32, threshold: i32) -> Self {
        if old < threshold && new >= threshold {
            Self::ToModern
        } else if old >= threshold && new < threshold {
            Self::ToLegacy
        } else if old >= 0 && new >= 0 {
            Self::Verify
        } else {
            Self::Unknown
        }
    }

    /// True for the two modes that rewrite values.
    #[must_use]
    pub fn is_migration(self) -> bool {
        matches!(self, Self::ToModern | Self::ToLegacy)
    }

    /// Namespace the stored values are expected to be in under this mode.
    ///
    /// `active` is the namespace of the running host, used when the mode
    /// does not move values.
    #[must_use]
    pub fn source_namespace(self, active: Namespace) -> Namespace {
        match self {
            Self::ToModern => Namespace::Legacy,
            Self::ToLegacy => Namespace::Modern,
            Self::Verify | Self::Unknown => active,
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToModern => write!(f, "ToModern"),
            Self::ToLegacy => write!(f, "ToLegacy"),
            Self::Verify => write!(f, "Verify"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One of the two code namespaces a table maps between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Codes used before the epoch threshold.
    Legacy,
    /// Codes used from the epoch threshold on.
    Modern,
}

impl Namespace {
    /// Namespace in effect for a host at `version`.
    #[must_use]
    pub fn for_version(version: i32, threshold: i32) -> Self {
        if version >= threshold {
            Self::Modern
        } else {
            Self::Legacy
        }
    }
}

/// An immutable `(legacy, modern, name)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMapping<C> {
    /// Code in the legacy namespace (or its sentinel).
    pub legacy: C,
    /// Code in the modern namespace (or its sentinel).
    pub modern: C,
    /// Human-readable name.
    pub name: String,
}

impl<C> CodeMapping<C> {
    /// Creates a mapping.
    pub fn new(legacy: C, modern: C, name: impl Into<String>) -> Self {
        Self {
            legacy,
            modern,
            name: name.into(),
        }
    }

    fn code(&self, namespace: Namespace) -> &C {
        match namespace {
            Namespace::Legacy => &self.legacy,
            Namespace::Modern => &self.modern,
        }
    }
}

/// Lookup tables keyed by legacy code and by modern code.
///
/// Built once from a list of mappings. When two mappings share a code in
/// one namespace, the first one listed owns the lookup, so sentinel rows
/// should come first.
///
/// # Examples
///
/// ```
/// use presence_config::codes::{CodeMapping, CodeTable, ConversionMode, Namespace};
///
/// let table = CodeTable::new(
///     vec![
///         CodeMapping::new(0, -1, "None"),
///         CodeMapping::new(57, 32, "Space"),
///         CodeMapping::new(112, -1, "Kana"),
///     ],
///     0,
///     -1,
/// );
/// assert_eq!(table.convert(&57, ConversionMode::ToModern, Namespace::Modern).unwrap(), 32);
/// assert_eq!(table.convert(&112, ConversionMode::ToModern, Namespace::Modern).unwrap(), -1);
/// assert_eq!(table.convert(&-1, ConversionMode::ToLegacy, Namespace::Legacy).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CodeTable<C> {
    entries: Vec<CodeMapping<C>>,
    by_legacy: BTreeMap<C, usize>,
    by_modern: BTreeMap<C, usize>,
    legacy_unknown: C,
    modern_unknown: C,
}

impl<C: Ord + Clone> CodeTable<C> {
    /// Builds the table with the given per-namespace sentinels.
    pub fn new(
        mappings: impl IntoIterator<Item = CodeMapping<C>>,
        legacy_unknown: C,
        modern_unknown: C,
    ) -> Self {
        let entries: Vec<CodeMapping<C>> = mappings.into_iter().collect();
        let mut by_legacy = BTreeMap::new();
        let mut by_modern = BTreeMap::new();
        for (index, mapping) in entries.iter().enumerate() {
            by_legacy.entry(mapping.legacy.clone()).or_insert(index);
            by_modern.entry(mapping.modern.clone()).or_insert(index);
        }
        Self {
            entries,
            by_legacy,
            by_modern,
            legacy_unknown,
            modern_unknown,
        }
    }

    /// Looks up the mapping that owns `code` in `namespace`.
    #[must_use]
    pub fn get(&self, code: &C, namespace: Namespace) -> Option<&CodeMapping<C>> {
        let index = match namespace {
            Namespace::Legacy => self.by_legacy.get(code),
            Namespace::Modern => self.by_modern.get(code),
        }?;
        self.entries.get(*index)
    }

    /// True when `code` is a known code in `namespace`.
    #[must_use]
    pub fn contains(&self, code: &C, namespace: Namespace) -> bool {
        self.get(code, namespace).is_some()
    }

    /// The "unknown" sentinel of `namespace`.
    #[must_use]
    pub fn unknown(&self, namespace: Namespace) -> &C {
        match namespace {
            Namespace::Legacy => &self.legacy_unknown,
            Namespace::Modern => &self.modern_unknown,
        }
    }

    /// Converts `code` according to `mode`.
    ///
    /// `ToModern` and `ToLegacy` map through the table, falling back to the
    /// target namespace's sentinel. `Verify` keeps `code` when it is known
    /// in the `active` namespace and yields that namespace's sentinel
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConversionMode`] for [`ConversionMode::Unknown`].
    pub fn convert(&self, code: &C, mode: ConversionMode, active: Namespace) -> Result<C> {
        let (from, to) = match mode {
            ConversionMode::ToModern => (Namespace::Legacy, Namespace::Modern),
            ConversionMode::ToLegacy => (Namespace::Modern, Namespace::Legacy),
            ConversionMode::Verify => {
                return Ok(if self.contains(code, active) {
                    code.clone()
                } else {
                    self.unknown(active).clone()
                });
            }
            ConversionMode::Unknown => {
                return Err(Error::InvalidConversionMode {
                    mode: mode.to_string(),
                })
            }
        };

        Ok(self
            .get(code, from)
            .map_or_else(|| self.unknown(to).clone(), |m| m.code(to).clone()))
    }

    /// All mappings, in the order they were listed.
    pub fn mappings(&self) -> impl Iterator<Item = &CodeMapping<C>> {
        self.entries.iter()
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
