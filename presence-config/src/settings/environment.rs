//! Environment variable handling for settings overrides.
//!
//! `PRESENCE_CONFIG_*` variables override values from the settings file.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::settings::schema::EngineSettings;

/// Overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PRESENCE_CONFIG_DIR";
/// Overrides the mod identifier.
pub const MOD_ID_ENV: &str = "PRESENCE_CONFIG_MOD_ID";
/// Overrides the host version.
pub const HOST_VERSION_ENV: &str = "PRESENCE_CONFIG_HOST_VERSION";
/// Overrides the game instance directory.
pub const USER_DIR_ENV: &str = "PRESENCE_CONFIG_USER_DIR";

/// Handles environment variable overrides for settings.
///
/// # Examples
///
/// ```no_run
/// use presence_config::settings::{EngineSettings, EnvironmentSettings};
///
/// let mut settings = EngineSettings::default();
/// EnvironmentSettings::apply_overrides(&mut settings).unwrap();
/// ```
pub struct EnvironmentSettings;

impl EnvironmentSettings {
    /// Apply environment variable overrides to settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `PRESENCE_CONFIG_HOST_VERSION` is not an integer.
    pub fn apply_overrides(settings: &mut EngineSettings) -> Result<()> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            settings.config_dir = Some(PathBuf::from(dir));
        }

        if let Ok(mod_id) = env::var(MOD_ID_ENV) {
            settings.mod_id = Some(mod_id);
        }

        if let Ok(version) = env::var(HOST_VERSION_ENV) {
            settings.host_version = Some(Self::parse_version(HOST_VERSION_ENV, &version)?);
        }

        if let Ok(dir) = env::var(USER_DIR_ENV) {
            settings.user_dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    fn parse_version(field: &str, s: &str) -> Result<i32> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid version number: '{s}'"),
        })
    }
}
