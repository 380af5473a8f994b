use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use super::{Dictionary, Property};
use crate::error::{Error, Result};
use crate::schema::{
    AccessibilitySettings, AdvancedSettings, BiomeSettings, Button, ButtonMap, ColorData,
    ColorSection, ConfigGraph, DimensionSettings, DisplaySettings, EntitySettings,
    GeneralSettings, GuiSettings, ModuleData, ModuleMap, PresenceData, ServerSettings,
    StatusMessages, TextMap,
};

/// The closed set of section and value-object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    /// The document root.
    Config,
    /// `generalSettings`.
    General,
    /// `biomeSettings`.
    Biome,
    /// `dimensionSettings`.
    Dimension,
    /// `serverSettings`.
    Server,
    /// `statusMessages`.
    Status,
    /// `advancedSettings`.
    Advanced,
    /// `advancedSettings.guiSettings`.
    Gui,
    /// `advancedSettings.entitySettings`.
    Entity,
    /// `accessibilitySettings`.
    Accessibility,
    /// `displaySettings`.
    Display,
    /// A color gradient or texture.
    Color,
    /// One RGBA stop of a color.
    ColorStop,
    /// A presence template.
    Presence,
    /// A module override.
    Module,
    /// A presence button.
    Button,
}

impl SectionKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Config,
        Self::General,
        Self::Biome,
        Self::Dimension,
        Self::Server,
        Self::Status,
        Self::Advanced,
        Self::Gui,
        Self::Entity,
        Self::Accessibility,
        Self::Display,
        Self::Color,
        Self::ColorStop,
        Self::Presence,
        Self::Module,
        Self::Button,
    ];

    /// Stable lower-case name, as used in engine settings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::General => "general",
            Self::Biome => "biome",
            Self::Dimension => "dimension",
            Self::Server => "server",
            Self::Status => "status",
            Self::Advanced => "advanced",
            Self::Gui => "gui",
            Self::Entity => "entity",
            Self::Accessibility => "accessibility",
            Self::Display => "display",
            Self::Color => "color",
            Self::ColorStop => "color_stop",
            Self::Presence => "presence",
            Self::Module => "module",
            Self::Button => "button",
        }
    }

    /// True for the value objects that may carry extra sub-fields.
    #[must_use]
    pub fn is_value_object(self) -> bool {
        matches!(
            self,
            Self::Color | Self::ColorStop | Self::Presence | Self::Module | Self::Button
        )
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::Validation {
                field: "section kind".to_string(),
                message: format!("unknown kind '{s}'"),
            })
    }
}

/// Named-property access shared by every section and value object.
///
/// Implementations are generated from an explicit field table, so reads and
/// writes by name are plain `match` dispatch.
pub trait Section: Clone + Serialize {
    /// Kind tag of the implementing type.
    const KIND: SectionKind;

    /// Document names of every property, in declaration order.
    const PROPERTIES: &'static [&'static str];

    /// A fresh default instance for a host at `host_version`.
    fn defaults(host_version: i32) -> Self;

    /// Reads a property by document name. `None` for unknown names and for
    /// optional properties that are unset.
    fn property(&self, name: &str) -> Option<Property>;

    /// Writes a property by document name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] for unknown names and
    /// [`Error::TypeMismatch`] when `value` has the wrong kind.
    fn set_property(&mut self, name: &str, value: Property) -> Result<()>;

    /// Document names of every property, through a value.
    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }

    /// Deep copy.
    #[must_use]
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Replaces `self` with `other` unless both serialize identically.
    /// Returns whether anything changed.
    fn transfer_from(&mut self, other: &Self) -> bool {
        match (serde_json::to_value(&*self), serde_json::to_value(other)) {
            (Ok(mine), Ok(theirs)) if mine == theirs => false,
            _ => {
                *self = other.clone();
                true
            }
        }
    }
}

/// Conversion between a field's Rust type and [`Property`].
pub(crate) trait Field: Sized {
    const KIND: &'static str;

    fn to_property(&self) -> Option<Property>;

    /// Hands the value back when it has the wrong kind.
    fn from_property(value: Property) -> std::result::Result<Self, Property>;
}

impl Field for bool {
    const KIND: &'static str = "boolean";

    fn to_property(&self) -> Option<Property> {
        Some(Property::Bool(*self))
    }

    fn from_property(value: Property) -> std::result::Result<Self, Property> {
        match value {
            Property::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl Field for i32 {
    const KIND: &'static str = "integer";

    fn to_property(&self) -> Option<Property> {
        Some(Property::Int(*self))
    }

    fn from_property(value: Property) -> std::result::Result<Self, Property> {
        match value {
            Property::Int(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl Field for String {
    const KIND: &'static str = "string";

    fn to_property(&self) -> Option<Property> {
        Some(Property::Text(self.clone()))
    }

    fn from_property(value: Property) -> std::result::Result<Self, Property> {
        match value {
            Property::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl<T: Field> Field for Option<T> {
    const KIND: &'static str = T::KIND;

    fn to_property(&self) -> Option<Property> {
        self.as_ref().and_then(Field::to_property)
    }

    fn from_property(value: Property) -> std::result::Result<Self, Property> {
        T::from_property(value).map(Some)
    }
}

macro_rules! dictionary_field {
    ($map:ty => $variant:ident) => {
        impl Field for $map {
            const KIND: &'static str = "dictionary";

            fn to_property(&self) -> Option<Property> {
                Some(Property::Dictionary(Dictionary::$variant(self.clone())))
            }

            fn from_property(value: Property) -> std::result::Result<Self, Property> {
                match value {
                    Property::Dictionary(Dictionary::$variant(map)) => Ok(map),
                    other => Err(other),
                }
            }
        }
    };
}

dictionary_field!(TextMap => Text);
dictionary_field!(ModuleMap => Modules);
dictionary_field!(ButtonMap => Buttons);

macro_rules! section_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Field for $ty {
            const KIND: &'static str = SectionKind::$variant.name();

            fn to_property(&self) -> Option<Property> {
                Some(Property::Section(AnySection::$variant(self.clone())))
            }

            fn from_property(value: Property) -> std::result::Result<Self, Property> {
                match value {
                    Property::Section(AnySection::$variant(section)) => Ok(section),
                    other => Err(other),
                }
            }
        }
    )*};
}

section_field!(
    GeneralSettings => General,
    BiomeSettings => Biome,
    DimensionSettings => Dimension,
    ServerSettings => Server,
    StatusMessages => Status,
    AdvancedSettings => Advanced,
    GuiSettings => Gui,
    EntitySettings => Entity,
    AccessibilitySettings => Accessibility,
    DisplaySettings => Display,
    ColorData => Color,
    ColorSection => ColorStop,
    PresenceData => Presence,
    ModuleData => Module,
    Button => Button,
);

/// Generates a [`Section`] implementation from a table of
/// `"documentName" => field` pairs.
macro_rules! impl_section {
    (
        $ty:ty, $kind:ident,
        defaults($host:ident) => $defaults:expr,
        { $($name:literal => $field:ident),* $(,)? }
    ) => {
        impl $crate::property::Section for $ty {
            const KIND: $crate::property::SectionKind = $crate::property::SectionKind::$kind;

            const PROPERTIES: &'static [&'static str] = &[$($name),*];

            fn defaults($host: i32) -> Self {
                $defaults
            }

            fn property(&self, name: &str) -> Option<$crate::property::Property> {
                match name {
                    $($name => $crate::property::section::Field::to_property(&self.$field),)*
                    _ => None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: $crate::property::Property,
            ) -> $crate::Result<()> {
                match name {
                    $($name => {
                        self.$field = $crate::property::section::Field::from_property(value)
                            .map_err(|found| $crate::property::section::mismatch(
                                name,
                                $crate::property::section::kind_of(&self.$field),
                                &found,
                            ))?;
                        Ok(())
                    })*
                    _ => Err($crate::Error::PropertyNotFound {
                        path: name.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use impl_section;

pub(crate) fn kind_of<T: Field>(_: &T) -> &'static str {
    T::KIND
}

pub(crate) fn mismatch(name: &str, expected: &str, found: &Property) -> Error {
    Error::TypeMismatch {
        path: name.to_string(),
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

/// Any section or value object, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum AnySection {
    /// The document root.
    Config(Box<ConfigGraph>),
    /// `generalSettings`.
    General(GeneralSettings),
    /// `biomeSettings`.
    Biome(BiomeSettings),
    /// `dimensionSettings`.
    Dimension(DimensionSettings),
    /// `serverSettings`.
    Server(ServerSettings),
    /// `statusMessages`.
    Status(StatusMessages),
    /// `advancedSettings`.
    Advanced(AdvancedSettings),
    /// `advancedSettings.guiSettings`.
    Gui(GuiSettings),
    /// `advancedSettings.entitySettings`.
    Entity(EntitySettings),
    /// `accessibilitySettings`.
    Accessibility(AccessibilitySettings),
    /// `displaySettings`.
    Display(DisplaySettings),
    /// A color gradient or texture.
    Color(ColorData),
    /// One RGBA color stop.
    ColorStop(ColorSection),
    /// A presence template.
    Presence(PresenceData),
    /// A module override.
    Module(ModuleData),
    /// A presence button.
    Button(Button),
}

macro_rules! dispatch {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            AnySection::Config($s) => $body,
            AnySection::General($s) => $body,
            AnySection::Biome($s) => $body,
            AnySection::Dimension($s) => $body,
            AnySection::Server($s) => $body,
            AnySection::Status($s) => $body,
            AnySection::Advanced($s) => $body,
            AnySection::Gui($s) => $body,
            AnySection::Entity($s) => $body,
            AnySection::Accessibility($s) => $body,
            AnySection::Display($s) => $body,
            AnySection::Color($s) => $body,
            AnySection::ColorStop($s) => $body,
            AnySection::Presence($s) => $body,
            AnySection::Module($s) => $body,
            AnySection::Button($s) => $body,
        }
    };
}

macro_rules! decode_as {
    ($raw:expr, $variant:ident) => {
        serde_json::from_value($raw.clone()).ok().map(AnySection::$variant)
    };
}

impl AnySection {
    /// Kind tag.
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Config(_) => SectionKind::Config,
            Self::General(_) => SectionKind::General,
            Self::Biome(_) => SectionKind::Biome,
            Self::Dimension(_) => SectionKind::Dimension,
            Self::Server(_) => SectionKind::Server,
            Self::Status(_) => SectionKind::Status,
            Self::Advanced(_) => SectionKind::Advanced,
            Self::Gui(_) => SectionKind::Gui,
            Self::Entity(_) => SectionKind::Entity,
            Self::Accessibility(_) => SectionKind::Accessibility,
            Self::Display(_) => SectionKind::Display,
            Self::Color(_) => SectionKind::Color,
            Self::ColorStop(_) => SectionKind::ColorStop,
            Self::Presence(_) => SectionKind::Presence,
            Self::Module(_) => SectionKind::Module,
            Self::Button(_) => SectionKind::Button,
        }
    }

    /// Reads a property by document name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Property> {
        dispatch!(self, s => s.property(name))
    }

    /// Writes a property by document name.
    ///
    /// # Errors
    ///
    /// See [`Section::set_property`].
    pub fn set_property(&mut self, name: &str, value: Property) -> Result<()> {
        dispatch!(self, s => s.set_property(name, value))
    }

    /// Document names of every property of this kind.
    #[must_use]
    pub fn property_names(&self) -> &'static [&'static str] {
        dispatch!(self, s => s.property_names())
    }

    /// Serializes the section.
    #[must_use]
    pub fn to_json(&self) -> Value {
        dispatch!(self, s => serde_json::to_value(s).unwrap_or(Value::Null))
    }

    /// Decodes a raw object into a section of the same kind.
    pub(crate) fn decode_like(&self, raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        match self {
            Self::Config(_) => serde_json::from_value(raw.clone())
                .ok()
                .map(|graph| Self::Config(Box::new(graph))),
            Self::General(_) => decode_as!(raw, General),
            Self::Biome(_) => decode_as!(raw, Biome),
            Self::Dimension(_) => decode_as!(raw, Dimension),
            Self::Server(_) => decode_as!(raw, Server),
            Self::Status(_) => decode_as!(raw, Status),
            Self::Advanced(_) => decode_as!(raw, Advanced),
            Self::Gui(_) => decode_as!(raw, Gui),
            Self::Entity(_) => decode_as!(raw, Entity),
            Self::Accessibility(_) => decode_as!(raw, Accessibility),
            Self::Display(_) => decode_as!(raw, Display),
            Self::Color(_) => decode_as!(raw, Color),
            Self::ColorStop(_) => decode_as!(raw, ColorStop),
            Self::Presence(_) => decode_as!(raw, Presence),
            Self::Module(_) => decode_as!(raw, Module),
            Self::Button(_) => decode_as!(raw, Button),
        }
    }
}
