//! Settings file loading.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::settings::environment::EnvironmentSettings;
use crate::settings::merger::SettingsMerger;
use crate::settings::schema::EngineSettings;
use crate::settings::validator::SettingsValidator;

/// Loads engine settings.
///
/// # Examples
///
/// ```no_run
/// use presence_config::settings::SettingsLoader;
/// use std::path::Path;
///
/// let settings = SettingsLoader::resolve(Some(Path::new("presence.yaml")), None).unwrap();
/// println!("document at {}", settings.document_path().unwrap().display());
/// ```
pub struct SettingsLoader;

impl SettingsLoader {
    /// Reads settings from `path`, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<EngineSettings> {
        if !path.exists() {
            log::debug!("no settings file at {}", path.display());
            return Ok(EngineSettings::default());
        }
        Self::load_file(path)
    }

    /// Load and parse a YAML settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<EngineSettings> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read settings file: {e}"),
        })?;
        if contents.trim().is_empty() {
            return Ok(EngineSettings::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Full resolution: file, then programmatic overrides, then environment,
    /// then validation.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, an environment override or validation
    /// fails.
    pub fn resolve(
        path: Option<&Path>,
        overrides: Option<&EngineSettings>,
    ) -> Result<EngineSettings> {
        let mut settings = match path {
            Some(path) => Self::load(path)?,
            None => EngineSettings::default(),
        };
        if let Some(overrides) = overrides {
            SettingsMerger::merge_into(&mut settings, overrides);
        }
        EnvironmentSettings::apply_overrides(&mut settings)?;
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}
