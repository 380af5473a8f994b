//! Value objects that may carry implementation-defined sub-fields.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Key every configuration dictionary must contain.
pub const DEFAULT_KEY: &str = "default";

/// A dictionary of plain strings.
pub type TextMap = OrdMap<String, String>;
/// A dictionary of per-entry module overrides.
pub type ModuleMap = OrdMap<String, ModuleData>;
/// A dictionary of presence buttons.
pub type ButtonMap = OrdMap<String, Button>;

/// One RGBA color stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSection {
    /// Red channel, 0-255.
    #[serde(deserialize_with = "lenient::integer")]
    pub red: i32,
    /// Green channel, 0-255.
    #[serde(deserialize_with = "lenient::integer")]
    pub green: i32,
    /// Blue channel, 0-255.
    #[serde(deserialize_with = "lenient::integer")]
    pub blue: i32,
    /// Alpha channel, 0-255.
    #[serde(deserialize_with = "lenient::integer")]
    pub alpha: i32,
}

impl ColorSection {
    /// Creates a color stop from its channels.
    #[must_use]
    pub fn new(red: i32, green: i32, blue: i32, alpha: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Splits packed `0xAARRGGBB` bits into channels.
    #[must_use]
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| i32::try_from((argb >> shift) & 0xFF).unwrap_or_default();
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }
}

impl Default for ColorSection {
    fn default() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// A color gradient or a texture reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorData {
    /// First (or only) color stop.
    #[serde(deserialize_with = "lenient::object")]
    pub start: ColorSection,
    /// Optional second stop of a gradient.
    #[serde(
        deserialize_with = "lenient::optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<ColorSection>,
    /// Texture resource drawn instead of (or tinted by) the colors.
    #[serde(deserialize_with = "lenient::text")]
    pub tex_location: String,
}

impl ColorData {
    /// A single-stop color.
    #[must_use]
    pub fn solid(start: ColorSection) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    /// A two-stop gradient.
    #[must_use]
    pub fn gradient(start: ColorSection, end: ColorSection) -> Self {
        Self {
            start,
            end: Some(end),
            tex_location: String::new(),
        }
    }

    /// A texture reference with a start tint.
    #[must_use]
    pub fn texture(start: ColorSection, tex_location: impl Into<String>) -> Self {
        Self {
            start,
            end: None,
            tex_location: tex_location.into(),
        }
    }
}

/// A clickable presence button.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    /// Text shown on the button.
    #[serde(deserialize_with = "lenient::text")]
    pub label: String,
    /// Target url, may contain placeholder expressions.
    #[serde(deserialize_with = "lenient::text")]
    pub url: String,
}

impl Button {
    /// Creates a button.
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A full rich-presence template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceData {
    /// Whether this template is used at all.
    #[serde(deserialize_with = "lenient::boolean")]
    pub enabled: bool,
    /// Replace the main template entirely instead of merging.
    #[serde(deserialize_with = "lenient::boolean")]
    pub use_as_main: bool,
    /// Marks a template attached to a specific game instance.
    #[serde(deserialize_with = "lenient::boolean")]
    pub is_instance: bool,
    /// Activity type ordinal (playing, listening, watching...).
    #[serde(deserialize_with = "lenient::integer")]
    pub activity_type: i32,
    /// Party privacy ordinal.
    #[serde(deserialize_with = "lenient::integer")]
    pub party_privacy: i32,
    /// First line of the presence.
    #[serde(deserialize_with = "lenient::text")]
    pub details: String,
    /// Second line of the presence.
    #[serde(deserialize_with = "lenient::text")]
    pub game_state: String,
    /// Large image asset key.
    #[serde(deserialize_with = "lenient::text")]
    pub large_image_key: String,
    /// Large image hover text.
    #[serde(deserialize_with = "lenient::text")]
    pub large_image_text: String,
    /// Small image asset key.
    #[serde(deserialize_with = "lenient::text")]
    pub small_image_key: String,
    /// Small image hover text.
    #[serde(deserialize_with = "lenient::text")]
    pub small_image_text: String,
    /// Start timestamp expression.
    #[serde(deserialize_with = "lenient::text")]
    pub start_timestamp: String,
    /// End timestamp expression.
    #[serde(deserialize_with = "lenient::text")]
    pub end_timestamp: String,
    /// Buttons keyed by name; must contain `default`.
    #[serde(deserialize_with = "lenient::object_map")]
    pub buttons: ButtonMap,
}

impl Default for PresenceData {
    fn default() -> Self {
        Self {
            enabled: true,
            use_as_main: false,
            is_instance: false,
            activity_type: 0,
            party_privacy: 0,
            details: String::new(),
            game_state: String::new(),
            large_image_key: String::new(),
            large_image_text: String::new(),
            small_image_key: String::new(),
            small_image_text: String::new(),
            start_timestamp: String::new(),
            end_timestamp: String::new(),
            buttons: OrdMap::unit(DEFAULT_KEY.to_string(), Button::default()),
        }
    }
}

/// Per-entry overrides for a biome, dimension, server, screen or entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleData {
    /// Message template replacing the section's default message.
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_override: Option<String>,
    /// Icon key replacing the section's default icon.
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_override: Option<String>,
    /// Complete presence template used instead of the main one.
    #[serde(
        deserialize_with = "lenient::optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<PresenceData>,
}

impl ModuleData {
    /// A module carrying only a text override.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text_override: Some(text.into()),
            ..Self::default()
        }
    }

    /// A module carrying text and icon overrides.
    #[must_use]
    pub fn with_text_and_icon(text: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            text_override: Some(text.into()),
            icon_override: Some(icon.into()),
            data: None,
        }
    }
}
