//! The verification / repair pass.
//!
//! [`Verifier::verify`] walks the raw document next to the decoded graph.
//! Every raw key is checked against the defaults for the running host:
//! unknown keys are reported, malformed leaves are reset, dictionaries
//! missing their `default` entry are merged with the defaults, and
//! epoch-sensitive leaves (keycodes, locale ids) are moved into the
//! host's namespace when the stored host version is on the other side of
//! the threshold.
//!
//! Leaves are routed to the epoch-aware converters by case-insensitive
//! substrings of their dotted path, since the same integer and string
//! kinds also carry ordinary settings.

use serde_json::Value;

use crate::codes::keycodes::{active_namespace, is_valid_key};
use crate::codes::locale::{is_known_locale, is_well_formed_locale};
use crate::codes::{convert_key, convert_locale, ConversionMode, KEYCODE_EPOCH, LOCALE_EPOCH};
use crate::error::Result;
use crate::logging::Logger;
use crate::messages::{LogMessage, MigrationCategory};
use crate::property::{Dictionary, Property, PropertyPath, SectionKind};
use crate::schema::lenient::scalar_text;
use crate::schema::{ConfigGraph, DEFAULT_HOST_VERSION, DEFAULT_KEY};
use crate::values::{is_valid_boolean, parse_integer};

/// Conversion modes for the two epoch-sensitive value families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionModes {
    /// Mode for keycode leaves.
    pub keycode: ConversionMode,
    /// Mode for locale id leaves.
    pub locale: ConversionMode,
}

impl ConversionModes {
    /// Modes for a document last written by `old_host` and now loaded by
    /// `new_host`.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::verify::ConversionModes;
    /// use presence_config::ConversionMode;
    ///
    /// let modes = ConversionModes::between(340, 400);
    /// assert_eq!(modes.keycode, ConversionMode::ToModern);
    /// assert_eq!(modes.locale, ConversionMode::Verify);
    /// ```
    #[must_use]
    pub fn between(old_host: i32, new_host: i32) -> Self {
        Self {
            keycode: ConversionMode::between(old_host, new_host, KEYCODE_EPOCH),
            locale: ConversionMode::between(old_host, new_host, LOCALE_EPOCH),
        }
    }

    /// Validation only, no remapping.
    #[must_use]
    pub fn verify_only() -> Self {
        Self {
            keycode: ConversionMode::Verify,
            locale: ConversionMode::Verify,
        }
    }
}

/// Knobs of the verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Host version the document is verified for.
    pub host_version: i32,
    /// Path fragments marking keycode leaves.
    pub keycode_triggers: Vec<String>,
    /// Path fragments marking locale id leaves.
    pub locale_triggers: Vec<String>,
    /// Value-object kinds whose children may be absent from the defaults.
    pub opaque_kinds: Vec<SectionKind>,
    /// Leaves whose path contains this fragment are not checked.
    pub reserved_substring: String,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            host_version: DEFAULT_HOST_VERSION,
            keycode_triggers: vec!["keycode".into(), "keybinding".into()],
            locale_triggers: vec![
                "language".into(),
                "lang".into(),
                "langId".into(),
                "languageId".into(),
            ],
            opaque_kinds: vec![
                SectionKind::Color,
                SectionKind::ColorStop,
                SectionKind::Presence,
                SectionKind::Module,
                SectionKind::Button,
            ],
            reserved_substring: "presence".into(),
        }
    }
}

/// One change or finding of a verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// A raw key outside the schema, left untouched.
    InvalidProperty {
        /// Dotted path of the key.
        path: String,
    },
    /// A leaf overwritten with its default.
    Reset {
        /// Dotted path of the leaf.
        path: String,
        /// Raw value found in the document.
        found: Value,
    },
    /// A dictionary completed with the default entries.
    MissingDefault {
        /// Dotted path of the dictionary.
        path: String,
        /// Keys that were added.
        added: Vec<String>,
    },
    /// A keycode moved between namespaces.
    KeycodeMigrated {
        /// Dotted path of the leaf.
        path: String,
        /// Stored code.
        old: i32,
        /// Code after conversion.
        new: i32,
    },
    /// A locale id moved between namespaces.
    LocaleMigrated {
        /// Dotted path of the leaf.
        path: String,
        /// Stored id.
        old: String,
        /// Id after conversion.
        new: String,
    },
}

impl Repair {
    /// Dotted path the repair refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidProperty { path }
            | Self::Reset { path, .. }
            | Self::MissingDefault { path, .. }
            | Self::KeycodeMigrated { path, .. }
            | Self::LocaleMigrated { path, .. } => path,
        }
    }

    /// True for value migrations, which are expected rather than faults.
    #[must_use]
    pub fn is_migration(&self) -> bool {
        matches!(self, Self::KeycodeMigrated { .. } | Self::LocaleMigrated { .. })
    }
}

/// Everything a verification pass found, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// The repairs.
    pub repairs: Vec<Repair>,
}

impl VerifyReport {
    /// True when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.repairs.is_empty()
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repairs.len()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    /// Iterates over the findings.
    pub fn iter(&self) -> std::slice::Iter<'_, Repair> {
        self.repairs.iter()
    }

    /// Paths of every reset leaf.
    #[must_use]
    pub fn reset_paths(&self) -> Vec<&str> {
        self.repairs
            .iter()
            .filter(|r| matches!(r, Repair::Reset { .. }))
            .map(Repair::path)
            .collect()
    }

    /// True if any change was written to the graph.
    #[must_use]
    pub fn changed_graph(&self) -> bool {
        self.repairs
            .iter()
            .any(|r| !matches!(r, Repair::InvalidProperty { .. }))
    }
}

/// Runs verification passes with fixed options.
///
/// # Examples
///
/// ```
/// use presence_config::{ConfigGraph, Logger, LogLevel, Verifier};
/// use presence_config::verify::ConversionModes;
/// use serde_json::json;
///
/// let raw = json!({"advancedSettings": {"debugMode": "maybe"}});
/// let mut graph = ConfigGraph::from_document(&raw).unwrap();
/// let defaults = ConfigGraph::default();
/// let report = Verifier::default()
///     .verify(
///         &raw,
///         &mut graph,
///         &defaults,
///         ConversionModes::verify_only(),
///         &Logger::new(LogLevel::Quiet),
///     )
///     .unwrap();
/// assert_eq!(report.reset_paths(), vec!["advancedSettings.debugMode"]);
/// assert!(!graph.advanced_settings.debug_mode);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    options: VerifyOptions,
}

impl Verifier {
    /// Creates a verifier.
    #[must_use]
    pub fn new(options: VerifyOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Checks every key of `raw` and repairs `graph` in place.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing a repair back into `graph` fails,
    /// which indicates a schema inconsistency rather than bad user data.
    pub fn verify(
        &self,
        raw: &Value,
        graph: &mut ConfigGraph,
        defaults: &ConfigGraph,
        modes: ConversionModes,
        logger: &Logger,
    ) -> Result<VerifyReport> {
        let mut pass = Pass {
            options: &self.options,
            defaults,
            modes,
            logger,
            report: VerifyReport::default(),
        };
        pass.object(raw, &PropertyPath::root(), graph)?;
        log::debug!("verification finished with {} finding(s)", pass.report.len());
        Ok(pass.report)
    }
}

struct Pass<'a> {
    options: &'a VerifyOptions,
    defaults: &'a ConfigGraph,
    modes: ConversionModes,
    logger: &'a Logger,
    report: VerifyReport,
}

fn matches_any(path: &PropertyPath, triggers: &[String]) -> bool {
    triggers.iter().any(|t| path.contains_ignore_case(t))
}

impl Pass<'_> {
    fn object(&mut self, raw: &Value, path: &PropertyPath, graph: &mut ConfigGraph) -> Result<()> {
        let Some(entries) = raw.as_object() else {
            return Ok(());
        };
        let parent_kind = match graph.get(path) {
            Some(Property::Section(section)) => Some(section.kind()),
            _ => None,
        };
        for (key, value) in entries {
            self.entry(key, value, path, parent_kind, graph)?;
        }
        Ok(())
    }

    fn entry(
        &mut self,
        key: &str,
        raw: &Value,
        parent: &PropertyPath,
        parent_kind: Option<SectionKind>,
        graph: &mut ConfigGraph,
    ) -> Result<()> {
        let path = parent.join(key);
        let current = graph.get(&path);
        let default = match (self.defaults.get(&path), &current) {
            (Some(default), _) => default,
            (None, Some(current))
                if parent_kind.is_some_and(|kind| self.options.opaque_kinds.contains(&kind)) =>
            {
                current.clone()
            }
            _ => {
                self.invalid(&path);
                return Ok(());
            }
        };

        if let Property::Section(_) = default {
            if !raw.is_object() {
                return self.reset(&path, raw, default, graph);
            }
            return self.object(raw, &path, graph);
        }
        if path
            .to_string()
            .contains(self.options.reserved_substring.as_str())
        {
            return Ok(());
        }

        let Some(current) = current else {
            return self.reset(&path, raw, default, graph);
        };
        let needs_reset = match (&default, &current) {
            (Property::Text(default), Property::Text(current)) => {
                !default.is_empty() && current.is_empty()
            }
            _ => false,
        };
        if needs_reset {
            return self.reset(&path, raw, default, graph);
        }

        match current {
            Property::Bool(_) => {
                if !scalar_text(raw).is_some_and(|text| is_valid_boolean(&text)) {
                    return self.reset(&path, raw, default, graph);
                }
            }
            Property::Int(_) => {
                let Some(code) = scalar_text(raw).and_then(|text| parse_integer(&text)) else {
                    return self.reset(&path, raw, default, graph);
                };
                if matches_any(&path, &self.options.keycode_triggers) {
                    return self.keycode(&path, code, raw, default, graph);
                }
            }
            Property::Dictionary(dictionary) => {
                return self.dictionary(&path, raw, &dictionary, &default, graph);
            }
            Property::Text(_) | Property::Section(_) => {
                if let Some(text) = raw_scalar(raw) {
                    if matches_any(&path, &self.options.locale_triggers) {
                        return self.locale(&path, &text, raw, default, graph);
                    }
                }
            }
        }
        Ok(())
    }

    fn keycode(
        &mut self,
        path: &PropertyPath,
        code: i32,
        raw: &Value,
        default: Property,
        graph: &mut ConfigGraph,
    ) -> Result<()> {
        let host = self.options.host_version;
        let mode = self.modes.keycode;
        let source = mode.source_namespace(active_namespace(host));
        if !is_valid_key(code, source) {
            return self.reset(path, raw, default, graph);
        }
        if !mode.is_migration() {
            return Ok(());
        }
        let converted = convert_key(code, mode, host)?;
        if converted != code {
            self.logger.emit(&LogMessage::MigrationApplied {
                category: MigrationCategory::Keycode,
                mode,
                path: path.to_string(),
                old: code.to_string(),
                new: converted.to_string(),
            });
            graph.set(path, Property::Int(converted))?;
            self.report.repairs.push(Repair::KeycodeMigrated {
                path: path.to_string(),
                old: code,
                new: converted,
            });
        }
        Ok(())
    }

    fn locale(
        &mut self,
        path: &PropertyPath,
        stored: &str,
        raw: &Value,
        default: Property,
        graph: &mut ConfigGraph,
    ) -> Result<()> {
        if !is_well_formed_locale(stored.trim()) {
            return self.reset(path, raw, default, graph);
        }
        let mode = self.modes.locale;
        if !mode.is_migration() {
            return Ok(());
        }
        if !is_known_locale(stored.trim()) {
            log::debug!("locale id {stored} at {path} is unlisted and converts by casing");
        }
        let converted = convert_locale(stored, mode, self.options.host_version)?;
        if converted != stored {
            self.logger.emit(&LogMessage::MigrationApplied {
                category: MigrationCategory::Language,
                mode,
                path: path.to_string(),
                old: stored.to_string(),
                new: converted.clone(),
            });
            graph.set(path, Property::Text(converted.clone()))?;
            self.report.repairs.push(Repair::LocaleMigrated {
                path: path.to_string(),
                old: stored.to_string(),
                new: converted,
            });
        }
        Ok(())
    }

    fn dictionary(
        &mut self,
        path: &PropertyPath,
        raw: &Value,
        current: &Dictionary,
        default: &Property,
        graph: &mut ConfigGraph,
    ) -> Result<()> {
        let defaults = default.as_dictionary();
        if let Some(defaults) = defaults.filter(|d| !current.has_default() && d.has_default()) {
            let merged = current.merge_missing(defaults);
            let added = defaults
                .keys()
                .into_iter()
                .filter(|k| !current.contains_key(k))
                .collect();
            self.logger.emit(&LogMessage::MissingDefault {
                path: path.to_string(),
            });
            graph.set(path, Property::Dictionary(merged))?;
            self.report.repairs.push(Repair::MissingDefault {
                path: path.to_string(),
                added,
            });
        }

        let Some(entries) = raw.as_object() else {
            return Ok(());
        };
        for (key, entry) in entries {
            let entry_path = path.join(key.as_str());
            let mistyped = match current {
                Dictionary::Text(_) => raw_scalar(entry).is_none(),
                Dictionary::Modules(_) | Dictionary::Buttons(_) => !entry.is_object(),
            };
            if !mistyped {
                if entry.is_object() && current.contains_key(key) {
                    self.object(entry, &entry_path, graph)?;
                }
                continue;
            }
            // Mistyped entries fall back to the schema's entry of the same
            // name, or to its `default` entry.
            let fallback = defaults.and_then(|d| d.get(key).or_else(|| d.get(DEFAULT_KEY)));
            match fallback {
                Some(fallback) => self.reset(&entry_path, entry, fallback, graph)?,
                None => self.invalid(&entry_path),
            }
        }
        Ok(())
    }

    fn reset(
        &mut self,
        path: &PropertyPath,
        raw: &Value,
        default: Property,
        graph: &mut ConfigGraph,
    ) -> Result<()> {
        self.logger.emit(&LogMessage::PropertyReset {
            path: path.to_string(),
        });
        graph.set(path, default)?;
        self.report.repairs.push(Repair::Reset {
            path: path.to_string(),
            found: raw.clone(),
        });
        Ok(())
    }

    fn invalid(&mut self, path: &PropertyPath) {
        self.logger.emit(&LogMessage::InvalidProperty {
            path: path.to_string(),
        });
        self.report.repairs.push(Repair::InvalidProperty {
            path: path.to_string(),
        });
    }
}

fn raw_scalar(raw: &Value) -> Option<String> {
    if raw.is_object() || raw.is_array() {
        None
    } else {
        scalar_text(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::schema::{ModuleData, DEFAULT_KEY};
    use serde_json::json;

    fn run(raw: &Value, host: i32, modes: ConversionModes) -> (ConfigGraph, VerifyReport) {
        let defaults = ConfigGraph::defaults(host);
        let mut graph = ConfigGraph::from_document(raw).unwrap();
        let verifier = Verifier::new(VerifyOptions {
            host_version: host,
            ..VerifyOptions::default()
        });
        let report = verifier
            .verify(raw, &mut graph, &defaults, modes, &Logger::new(LogLevel::Quiet))
            .unwrap();
        (graph, report)
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let raw = ConfigGraph::defaults(765).to_document().unwrap();
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(graph, ConfigGraph::defaults(765));
    }

    #[test]
    fn test_unknown_key_is_reported_not_removed() {
        let raw = json!({"generalSettings": {"showTime": true}});
        let (_, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(
            report.repairs,
            vec![Repair::InvalidProperty {
                path: "generalSettings.showTime".into()
            }]
        );
        assert!(!report.changed_graph());
    }

    #[test]
    fn test_invalid_boolean_and_integer_are_reset() {
        let raw = json!({
            "advancedSettings": {"debugMode": "maybe", "refreshRate": "often"}
        });
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(
            report.reset_paths(),
            vec!["advancedSettings.debugMode", "advancedSettings.refreshRate"]
        );
        assert_eq!(graph.advanced_settings.refresh_rate, 2);
    }

    #[test]
    fn test_textual_scalars_are_accepted() {
        let raw = json!({"advancedSettings": {"debugMode": "TRUE", "refreshRate": "7"}});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert!(report.is_clean());
        assert!(graph.advanced_settings.debug_mode);
        assert_eq!(graph.advanced_settings.refresh_rate, 7);
    }

    #[test]
    fn test_empty_text_with_default_is_reset() {
        let raw = json!({"generalSettings": {"clientId": ""}});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(report.reset_paths(), vec!["generalSettings.clientId"]);
        assert_eq!(graph.general_settings.client_id, "450485984333660181");
    }

    #[test]
    fn test_keycode_migrates_to_modern() {
        let raw = json!({"accessibilitySettings": {"configKeyCode": 57}});
        let (graph, report) = run(&raw, 400, ConversionModes::between(340, 400));
        assert_eq!(graph.accessibility_settings.config_key_code, 32);
        assert_eq!(
            report.repairs,
            vec![Repair::KeycodeMigrated {
                path: "accessibilitySettings.configKeyCode".into(),
                old: 57,
                new: 32
            }]
        );
    }

    #[test]
    fn test_unknown_keycode_is_reset() {
        let raw = json!({"accessibilitySettings": {"configKeyCode": 9999}});
        let (graph, report) = run(&raw, 765, ConversionModes::between(700, 765));
        assert_eq!(graph.accessibility_settings.config_key_code, 96);
        assert_eq!(report.reset_paths(), vec!["accessibilitySettings.configKeyCode"]);
    }

    #[test]
    fn test_locale_migrates_only_across_epoch() {
        let raw = json!({"accessibilitySettings": {"languageId": "en_US"}});
        let (graph, report) = run(&raw, 400, ConversionModes::between(200, 400));
        assert_eq!(graph.accessibility_settings.language_id, "en_us");
        assert!(report.iter().all(Repair::is_migration));

        let (graph, report) = run(&raw, 400, ConversionModes::between(350, 400));
        assert_eq!(graph.accessibility_settings.language_id, "en_US");
        assert!(report.is_clean());
    }

    #[test]
    fn test_malformed_locale_is_reset() {
        let raw = json!({"accessibilitySettings": {"languageId": "zz"}});
        let (graph, report) = run(&raw, 765, ConversionModes::between(200, 765));
        assert_eq!(graph.accessibility_settings.language_id, "en_us");
        assert_eq!(report.reset_paths(), vec!["accessibilitySettings.languageId"]);

        let (_, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(report.reset_paths(), vec!["accessibilitySettings.languageId"]);
    }

    #[test]
    fn test_unlisted_locale_is_recased() {
        let raw = json!({"accessibilitySettings": {"languageId": "xx_YY"}});
        let (graph, report) = run(&raw, 765, ConversionModes::between(200, 765));
        assert_eq!(graph.accessibility_settings.language_id, "xx_yy");
        assert_eq!(
            report.repairs,
            vec![Repair::LocaleMigrated {
                path: "accessibilitySettings.languageId".into(),
                old: "xx_YY".into(),
                new: "xx_yy".into()
            }]
        );
    }

    #[test]
    fn test_section_of_wrong_type_is_reset() {
        let raw = json!({"advancedSettings": "oops"});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(report.reset_paths(), vec!["advancedSettings"]);
        assert_eq!(
            graph.advanced_settings,
            ConfigGraph::defaults(765).advanced_settings
        );
    }

    #[test]
    fn test_module_entry_of_wrong_type_is_reset() {
        let raw = json!({"biomeSettings": {"biomeData": {
            "default": {"textOverride": "Somewhere"},
            "plains": "Plains text"
        }}});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(
            report.repairs,
            vec![Repair::Reset {
                path: "biomeSettings.biomeData.plains".into(),
                found: json!("Plains text")
            }]
        );
        let defaults = ConfigGraph::defaults(765);
        assert_eq!(
            graph.biome_settings.biome_data["plains"],
            defaults.biome_settings.biome_data[DEFAULT_KEY]
        );
        assert_eq!(
            graph.biome_settings.biome_data[DEFAULT_KEY],
            ModuleData::with_text("Somewhere")
        );
    }

    #[test]
    fn test_missing_default_entry_is_merged() {
        let raw = json!({"biomeSettings": {"biomeData": {
            "plains": {"textOverride": "Plains!"}
        }}});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        let data = &graph.biome_settings.biome_data;
        assert!(data.contains_key(DEFAULT_KEY));
        assert_eq!(data["plains"], ModuleData::with_text("Plains!"));
        assert_eq!(
            report.repairs,
            vec![Repair::MissingDefault {
                path: "biomeSettings.biomeData".into(),
                added: vec![DEFAULT_KEY.into()]
            }]
        );
    }

    #[test]
    fn test_opaque_children_are_tolerated() {
        let raw = json!({"biomeSettings": {"biomeData": {
            "default": {"textOverride": "Somewhere"},
            "plains": {"iconOverride": "grass", "data": {"enabled": "nah"}}
        }}});
        let (graph, report) = run(&raw, 765, ConversionModes::verify_only());
        assert_eq!(
            report.reset_paths(),
            vec!["biomeSettings.biomeData.plains.data.enabled"]
        );
        assert_eq!(
            graph.biome_settings.biome_data["plains"].icon_override.as_deref(),
            Some("grass")
        );
    }

    #[test]
    fn test_presence_template_leaves_are_skipped() {
        let raw = json!({"displaySettings": {"presenceData": {"enabled": "maybe", "details": ""}}});
        let (_, report) = run(&raw, 765, ConversionModes::verify_only());
        assert!(report.is_clean());
    }

    #[test]
    fn test_opaque_kinds_are_configurable() {
        let raw = json!({"accessibilitySettings": {"guiBackground": {
            "end": {"red": 1, "green": 2, "blue": 3, "alpha": 4}
        }}});
        let defaults = ConfigGraph::default();
        let logger = Logger::new(LogLevel::Quiet);

        let mut graph = ConfigGraph::from_document(&raw).unwrap();
        let report = Verifier::default()
            .verify(&raw, &mut graph, &defaults, ConversionModes::verify_only(), &logger)
            .unwrap();
        assert!(report.is_clean(), "{report:?}");

        let strict = Verifier::new(VerifyOptions {
            opaque_kinds: vec![],
            ..VerifyOptions::default()
        });
        let mut graph = ConfigGraph::from_document(&raw).unwrap();
        let report = strict
            .verify(&raw, &mut graph, &defaults, ConversionModes::verify_only(), &logger)
            .unwrap();
        assert_eq!(
            report.repairs,
            vec![Repair::InvalidProperty {
                path: "accessibilitySettings.guiBackground.end".into()
            }]
        );
    }
}
