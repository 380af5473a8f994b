//! Translatable log messages.
//!
//! Each message carries a stable translation key, so a host application
//! with its own language files can look the line up, plus an English
//! rendering through `Display` for everyone else.

use std::fmt;
use std::path::PathBuf;

use crate::codes::ConversionMode;
use crate::logging::Severity;

/// Which family of epoch-sensitive values a migration notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCategory {
    /// Input keycodes.
    Keycode,
    /// Locale / language identifiers.
    Language,
}

impl fmt::Display for MigrationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keycode => write!(f, "KEYCODE"),
            Self::Language => write!(f, "LANGUAGE"),
        }
    }
}

/// A user-facing log line emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMessage {
    /// A document key is not part of the schema.
    InvalidProperty {
        /// Dotted path of the key.
        path: String,
    },
    /// A leaf was empty or invalid and has been reset.
    PropertyReset {
        /// Dotted path of the leaf.
        path: String,
    },
    /// A dictionary lacked its `default` entry and was merged with defaults.
    MissingDefault {
        /// Dotted path of the dictionary.
        path: String,
    },
    /// A valid but stale value was moved into the current epoch.
    MigrationApplied {
        /// Value family.
        category: MigrationCategory,
        /// Direction that was applied.
        mode: ConversionMode,
        /// Dotted path of the leaf.
        path: String,
        /// Value before migration.
        old: String,
        /// Value after migration.
        new: String,
    },
    /// A text leaf was rewritten by a migration step.
    PropertyModified {
        /// Dotted path of the leaf.
        path: String,
        /// Value before the rewrite.
        old: String,
        /// Value after the rewrite.
        new: String,
    },
    /// The document schema is older than the engine's.
    Outdated {
        /// Stored schema version.
        from: i32,
        /// Current schema version.
        to: i32,
    },
    /// A new document was created.
    NewFile {
        /// Document location.
        path: PathBuf,
    },
    /// The document was written.
    Saved {
        /// Document location.
        path: PathBuf,
    },
    /// The document could not be read.
    ReadFailed {
        /// Document location.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
    /// An unreadable document was moved aside.
    BackedUp {
        /// Original location.
        path: PathBuf,
        /// Backup location.
        backup: PathBuf,
    },
    /// A legacy properties file is being imported.
    LegacyImport {
        /// Location of the legacy file.
        path: PathBuf,
    },
    /// One legacy property was carried over into the document.
    ImportedProperty {
        /// Camel-cased name in the legacy file.
        legacy: String,
        /// Dotted path it was written to.
        path: String,
    },
    /// A SimpleRPC configuration is being imported.
    SimpleRpcImport {
        /// Location of the main TOML file.
        path: PathBuf,
        /// Declared `general.version`.
        version: i64,
    },
    /// A legacy file was found but cannot be imported.
    UnsupportedImport {
        /// Location of the file.
        path: PathBuf,
        /// Why it was skipped.
        reason: String,
    },
}

impl LogMessage {
    /// Stable translation key for this message.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvalidProperty { .. } => "config.prop.invalid",
            Self::PropertyReset { .. } => "config.prop.empty",
            Self::MissingDefault { .. } => "config.missing.default",
            Self::MigrationApplied { .. } => "migration.apply",
            Self::PropertyModified { .. } => "config.prop.modified",
            Self::Outdated { .. } => "config.outdated",
            Self::NewFile { .. } => "config.new",
            Self::Saved { .. } => "config.save",
            Self::ReadFailed { .. } => "config.read",
            Self::BackedUp { .. } => "config.backup",
            Self::LegacyImport { .. } => "import.legacy",
            Self::ImportedProperty { .. } => "import.property",
            Self::SimpleRpcImport { .. } => "import.simple_rpc",
            Self::UnsupportedImport { .. } => "import.unsupported",
        }
    }

    /// Severity the message is logged at.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidProperty { .. }
            | Self::PropertyReset { .. }
            | Self::MissingDefault { .. }
            | Self::ReadFailed { .. }
            | Self::UnsupportedImport { .. } => Severity::Error,
            Self::BackedUp { .. } => Severity::Warn,
            Self::MigrationApplied { .. }
            | Self::PropertyModified { .. }
            | Self::Outdated { .. }
            | Self::NewFile { .. }
            | Self::Saved { .. }
            | Self::LegacyImport { .. }
            | Self::ImportedProperty { .. }
            | Self::SimpleRpcImport { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProperty { path } => {
                write!(f, "Invalid property \"{path}\" found in config, skipping")
            }
            Self::PropertyReset { path } => write!(
                f,
                "Property \"{path}\" is empty or invalid, resetting to its default value"
            ),
            Self::MissingDefault { path } => write!(
                f,
                "Property \"{path}\" is missing its \"default\" entry, restoring default entries"
            ),
            Self::MigrationApplied {
                category,
                mode,
                path,
                old,
                new,
            } => write!(
                f,
                "Applied {category} migration ({mode}) to \"{path}\": {old} => {new}"
            ),
            Self::PropertyModified { path, old, new } => {
                write!(f, "Modified property \"{path}\": \"{old}\" => \"{new}\"")
            }
            Self::Outdated { from, to } => write!(
                f,
                "Config schema is outdated (v{from}), migrating to v{to}"
            ),
            Self::NewFile { path } => write!(f, "Created new config at {}", path.display()),
            Self::Saved { path } => write!(f, "Saved config to {}", path.display()),
            Self::ReadFailed { path, reason } => {
                write!(f, "Failed to read config at {}: {reason}", path.display())
            }
            Self::BackedUp { path, backup } => write!(
                f,
                "Moved unreadable config {} to {}",
                path.display(),
                backup.display()
            ),
            Self::LegacyImport { path } => {
                write!(f, "Importing legacy config from {}", path.display())
            }
            Self::ImportedProperty { legacy, path } => {
                write!(f, "Migrating legacy property {legacy} to \"{path}\"")
            }
            Self::SimpleRpcImport { path, version } => write!(
                f,
                "Importing Simple RPC config (v{version}) from {}",
                path.display()
            ),
            Self::UnsupportedImport { path, reason } => {
                write!(f, "Skipping {}: {reason}", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_stable() {
        assert_eq!(
            LogMessage::InvalidProperty { path: "a".into() }.key(),
            "config.prop.invalid"
        );
        assert_eq!(
            LogMessage::PropertyReset { path: "a".into() }.key(),
            "config.prop.empty"
        );
        assert_eq!(
            LogMessage::MissingDefault { path: "a".into() }.key(),
            "config.missing.default"
        );
    }

    #[test]
    fn test_repairs_are_errors_and_migrations_are_info() {
        let reset = LogMessage::PropertyReset { path: "x".into() };
        assert_eq!(reset.severity(), Severity::Error);

        let migrated = LogMessage::MigrationApplied {
            category: MigrationCategory::Keycode,
            mode: ConversionMode::ToModern,
            path: "accessibilitySettings.configKeyCode".into(),
            old: "57".into(),
            new: "32".into(),
        };
        assert_eq!(migrated.severity(), Severity::Info);
        assert_eq!(migrated.key(), "migration.apply");
    }

    #[test]
    fn test_migration_display_names_path_and_values() {
        let msg = LogMessage::MigrationApplied {
            category: MigrationCategory::Language,
            mode: ConversionMode::ToLegacy,
            path: "accessibilitySettings.languageId".into(),
            old: "en_us".into(),
            new: "en_US".into(),
        };
        let text = msg.to_string();
        assert!(text.contains("LANGUAGE"));
        assert!(text.contains("accessibilitySettings.languageId"));
        assert!(text.contains("en_us => en_US"));
    }
}
