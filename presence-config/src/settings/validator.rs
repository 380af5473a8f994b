//! Settings validation.

use crate::error::{Error, Result};
use crate::property::SectionKind;
use crate::settings::schema::EngineSettings;

/// Validates engine settings.
///
/// # Examples
///
/// ```
/// use presence_config::settings::{EngineSettings, SettingsValidator};
///
/// SettingsValidator::validate(&EngineSettings::default()).unwrap();
/// ```
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate a complete settings value.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or path-like mod id, a
    /// negative host version, empty trigger strings, or unknown opaque
    /// kinds.
    pub fn validate(settings: &EngineSettings) -> Result<()> {
        if let Some(ref mod_id) = settings.mod_id {
            Self::validate_mod_id(mod_id)?;
        }

        if let Some(version) = settings.host_version {
            if version < 0 {
                return Err(Error::Validation {
                    field: "host_version".into(),
                    message: "Host version cannot be negative".into(),
                });
            }
        }

        if let Some(ref triggers) = settings.keycode_triggers {
            Self::validate_triggers("keycode_triggers", triggers)?;
        }
        if let Some(ref triggers) = settings.locale_triggers {
            Self::validate_triggers("locale_triggers", triggers)?;
        }

        if let Some(ref kinds) = settings.opaque_kinds {
            for kind in kinds {
                let parsed: SectionKind = kind.parse().map_err(|_| Error::Validation {
                    field: "opaque_kinds".into(),
                    message: format!("Unknown kind '{kind}'"),
                })?;
                if !parsed.is_value_object() {
                    return Err(Error::Validation {
                        field: "opaque_kinds".into(),
                        message: format!("'{kind}' is a section, not a value object"),
                    });
                }
            }
        }

        if let Some(ref reserved) = settings.reserved_substring {
            if reserved.is_empty() {
                return Err(Error::Validation {
                    field: "reserved_substring".into(),
                    message: "Reserved substring cannot be empty".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_mod_id(mod_id: &str) -> Result<()> {
        if mod_id.trim().is_empty() {
            return Err(Error::Validation {
                field: "mod_id".into(),
                message: "Mod id cannot be empty".into(),
            });
        }
        if mod_id.contains(['/', '\\']) || mod_id.contains('\0') {
            return Err(Error::Validation {
                field: "mod_id".into(),
                message: "Mod id cannot contain path separators or null bytes".into(),
            });
        }
        Ok(())
    }

    fn validate_triggers(field: &str, triggers: &[String]) -> Result<()> {
        if triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::Validation {
                field: field.into(),
                message: "Trigger strings cannot be empty".into(),
            });
        }
        Ok(())
    }
}
