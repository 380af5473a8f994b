//! The typed configuration graph.
//!
//! [`ConfigGraph`] is the root of the document. Every section decodes
//! leniently (see [`lenient`]) so one malformed leaf never costs the rest of
//! the user's settings.

mod accessors;
pub mod elements;
pub mod lenient;
pub mod sections;

use serde::{Deserialize, Serialize};

pub use elements::{
    Button, ButtonMap, ColorData, ColorSection, ModuleData, ModuleMap, PresenceData, TextMap,
    DEFAULT_KEY,
};
pub use sections::{
    AccessibilitySettings, AdvancedSettings, BiomeSettings, DimensionSettings, DisplaySettings,
    EntitySettings, GeneralSettings, GuiSettings, ServerSettings, StatusMessages,
};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i32 = 6;

/// Host version assumed when none is supplied.
pub const DEFAULT_HOST_VERSION: i32 = 765;

/// Document key of the schema version.
pub const SCHEMA_VERSION_KEY: &str = "_schemaVersion";

/// Document key of the host version that last wrote the document.
pub const HOST_VERSION_KEY: &str = "_lastMCVersionId";

/// Root of the configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigGraph {
    /// Schema version the document was written with.
    #[serde(rename = "_schemaVersion", default, deserialize_with = "lenient::integer")]
    pub schema_version: i32,
    /// Host version that last wrote the document.
    #[serde(rename = "_lastMCVersionId", default, deserialize_with = "lenient::integer")]
    pub last_host_version: i32,
    /// Launcher detection and client settings.
    #[serde(deserialize_with = "lenient::object")]
    pub general_settings: GeneralSettings,
    /// Biome overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub biome_settings: BiomeSettings,
    /// Dimension overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub dimension_settings: DimensionSettings,
    /// Server settings and overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub server_settings: ServerSettings,
    /// Fixed game state messages.
    #[serde(deserialize_with = "lenient::object")]
    pub status_messages: StatusMessages,
    /// Behaviour switches, screen and entity overrides.
    #[serde(deserialize_with = "lenient::object")]
    pub advanced_settings: AdvancedSettings,
    /// Rendering and input settings.
    #[serde(deserialize_with = "lenient::object")]
    pub accessibility_settings: AccessibilitySettings,
    /// Main presence template.
    #[serde(deserialize_with = "lenient::object")]
    pub display_settings: DisplaySettings,

    /// Set when the graph was created from defaults during this load.
    #[serde(skip)]
    pub is_new_file: bool,
    /// Set when the graph differs from what the application last applied.
    #[serde(skip)]
    pub has_changed: bool,
}

impl ConfigGraph {
    /// A fresh default graph for a host at `host_version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::{ConfigGraph, SCHEMA_VERSION};
    ///
    /// let graph = ConfigGraph::defaults(340);
    /// assert_eq!(graph.schema_version, SCHEMA_VERSION);
    /// assert_eq!(graph.accessibility_settings.config_key_code, 41);
    /// ```
    #[must_use]
    pub fn defaults(host_version: i32) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            last_host_version: host_version,
            general_settings: GeneralSettings::default(),
            biome_settings: BiomeSettings::default(),
            dimension_settings: DimensionSettings::default(),
            server_settings: ServerSettings::default(),
            status_messages: StatusMessages::default(),
            advanced_settings: AdvancedSettings::default(),
            accessibility_settings: AccessibilitySettings::for_host(host_version),
            display_settings: DisplaySettings::default(),
            is_new_file: false,
            has_changed: false,
        }
    }

    /// Deep copy, including the transient flags.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Serializes the persisted part of the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_document(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes a raw document. Unknown keys are ignored and mistyped leaves
    /// fall back to zero values.
    ///
    /// # Errors
    ///
    /// Returns an error only when `raw` is not a JSON object.
    pub fn from_document(raw: &serde_json::Value) -> crate::Result<Self> {
        if !raw.is_object() {
            return Err(crate::Error::Validation {
                field: "document".to_string(),
                message: "root is not an object".to_string(),
            });
        }
        Ok(Self::deserialize(raw)?)
    }
}

impl Default for ConfigGraph {
    fn default() -> Self {
        Self::defaults(DEFAULT_HOST_VERSION)
    }
}

impl PartialEq for ConfigGraph {
    fn eq(&self, other: &Self) -> bool {
        self.schema_version == other.schema_version
            && self.last_host_version == other.last_host_version
            && self.general_settings == other.general_settings
            && self.biome_settings == other.biome_settings
            && self.dimension_settings == other.dimension_settings
            && self.server_settings == other.server_settings
            && self.status_messages == other.status_messages
            && self.advanced_settings == other.advanced_settings
            && self.accessibility_settings == other.accessibility_settings
            && self.display_settings == other.display_settings
    }
}

impl Eq for ConfigGraph {}
