//! Engine settings schema.
//!
//! Every field is optional in the file. Accessors return the effective
//! value, falling back to the built-in default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::{init_logger, LogLevel, Logger};
use crate::property::SectionKind;
use crate::schema::DEFAULT_HOST_VERSION;
use crate::verify::VerifyOptions;

/// Mod identifier used when none is configured.
pub const DEFAULT_MOD_ID: &str = "craftpresence";

/// Directory name below the home directory used when no config dir is set.
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".presence-config";

/// Settings of the engine itself (not of the managed document).
///
/// # Examples
///
/// ```
/// use presence_config::settings::EngineSettings;
///
/// let settings = EngineSettings {
///     mod_id: Some("mymod".to_string()),
///     config_dir: Some("/tmp/cfg".into()),
///     ..Default::default()
/// };
/// assert_eq!(
///     settings.document_path().unwrap(),
///     std::path::PathBuf::from("/tmp/cfg/mymod.json")
/// );
/// assert_eq!(settings.host_version(), 765);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    /// Identifier the document and legacy files are named after.
    pub mod_id: Option<String>,

    /// Directory holding the document.
    pub config_dir: Option<PathBuf>,

    /// Directory of the running game instance, probed by imports.
    pub user_dir: Option<PathBuf>,

    /// Version of the running host.
    pub host_version: Option<i32>,

    /// Path fragments routing integer leaves to keycode conversion.
    pub keycode_triggers: Option<Vec<String>>,

    /// Path fragments routing string leaves to locale conversion.
    pub locale_triggers: Option<Vec<String>>,

    /// Value-object kinds whose sub-fields are not checked against defaults.
    pub opaque_kinds: Option<Vec<String>>,

    /// Path fragment excluding leaves from verification.
    pub reserved_substring: Option<String>,

    /// Log level name (`quiet`, `normal`, `verbose`).
    pub log_mode: Option<String>,
}

impl EngineSettings {
    /// Effective mod identifier.
    #[must_use]
    pub fn mod_id(&self) -> &str {
        self.mod_id.as_deref().unwrap_or(DEFAULT_MOD_ID)
    }

    /// Effective host version.
    #[must_use]
    pub fn host_version(&self) -> i32 {
        self.host_version.unwrap_or(DEFAULT_HOST_VERSION)
    }

    /// Effective configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }
        home::home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Validation {
                field: "config_dir".into(),
                message: "Cannot determine home directory".into(),
            })
    }

    /// Effective game instance directory.
    ///
    /// # Errors
    ///
    /// Returns an error if none is configured and the working directory is
    /// unavailable.
    pub fn user_dir(&self) -> Result<PathBuf> {
        match &self.user_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Location of the managed document, `<config_dir>/<mod_id>.json`.
    ///
    /// # Errors
    ///
    /// See [`EngineSettings::config_dir`].
    pub fn document_path(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(format!("{}.json", self.mod_id())))
    }

    /// Options for the verification pass.
    ///
    /// # Errors
    ///
    /// Returns an error if an opaque kind name is unknown.
    pub fn verify_options(&self) -> Result<VerifyOptions> {
        let defaults = VerifyOptions::default();
        let opaque_kinds = match &self.opaque_kinds {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<SectionKind>())
                .collect::<Result<Vec<_>>>()?,
            None => defaults.opaque_kinds,
        };
        Ok(VerifyOptions {
            host_version: self.host_version(),
            keycode_triggers: self
                .keycode_triggers
                .clone()
                .unwrap_or(defaults.keycode_triggers),
            locale_triggers: self
                .locale_triggers
                .clone()
                .unwrap_or(defaults.locale_triggers),
            opaque_kinds,
            reserved_substring: self
                .reserved_substring
                .clone()
                .unwrap_or(defaults.reserved_substring),
        })
    }

    /// Logger at the configured level, or from flags and environment.
    #[must_use]
    pub fn logger(&self) -> Logger {
        self.log_mode
            .as_deref()
            .and_then(|mode| LogLevel::parse(mode).ok())
            .map_or_else(|| init_logger(false, false), Logger::new)
    }
}
