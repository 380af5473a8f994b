//! Error types for the presence-config library.
//!
//! Recoverable document problems (bad leaves, missing dictionary defaults,
//! stale keycodes) never surface here: the verification pass repairs them
//! and reports through logging. What remains are I/O and decode failures,
//! programming errors against the property resolver, and the one fatal
//! condition of the load sequence, a migration step whose precondition is
//! not met.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a presence-config error.
///
/// # Examples
///
/// ```
/// use presence_config::{Error, Result};
///
/// fn schema_version() -> Result<i32> {
///     Ok(6)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the presence-config library.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document could not be encoded or decoded.
    #[error("document error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML file consulted by a legacy import could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The engine settings file could not be parsed.
    #[error("settings error: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A property path did not resolve to a container that can hold the value.
    #[error("property not found: {path}")]
    PropertyNotFound {
        /// The dotted property path.
        path: String,
    },

    /// A value of the wrong kind was written to a property.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The dotted property path.
        path: String,
        /// The kind the property holds.
        expected: String,
        /// The kind that was supplied.
        found: String,
    },

    /// A migration step found the document in a shape it cannot migrate.
    #[error("migration {from}->{to} cannot run: required field '{path}' is missing")]
    MigrationPrecondition {
        /// Lower bound of the failing step.
        from: i32,
        /// Upper bound of the failing step.
        to: i32,
        /// Dotted path of the absent raw field.
        path: String,
    },

    /// A conversion was requested in a mode that cannot convert.
    #[error("conversion mode {mode} cannot be used to convert a value")]
    InvalidConversionMode {
        /// Name of the rejected mode.
        mode: String,
    },

    /// A migration step was registered over an interval already covered.
    #[error("migration step {from}->{to} overlaps a registered step")]
    StepOverlap {
        /// Lower bound of the rejected step.
        from: i32,
        /// Upper bound of the rejected step.
        to: i32,
    },
}

impl Error {
    /// Check if the error must abort the load sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::Error;
    ///
    /// let err = Error::MigrationPrecondition {
    ///     from: 1,
    ///     to: 2,
    ///     path: "generalSettings.showTime".into(),
    /// };
    /// assert!(err.is_fatal());
    /// ```
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MigrationPrecondition { .. })
    }

    /// Check if error indicates a missing file or property.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            Self::PropertyNotFound { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_errors_name_the_field() {
        let err = Error::Validation {
            field: "keycode_triggers".to_string(),
            message: "trigger strings cannot be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation error for 'keycode_triggers': trigger strings cannot be empty"
        );

        let err = Error::InvalidPath {
            path: PathBuf::from("presence.yaml"),
            reason: "Failed to read settings file".to_string(),
        };
        assert!(err.to_string().contains("presence.yaml"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_property_not_found_error() {
        let err = Error::PropertyNotFound {
            path: "generalSettings.nope".to_string(),
        };
        assert!(format!("{err}").contains("generalSettings.nope"));
        assert!(err.is_not_found());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_type_mismatch_error() {
        let err = Error::TypeMismatch {
            path: "advancedSettings.refreshRate".to_string(),
            expected: "integer".to_string(),
            found: "text".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("expected integer"));
        assert!(display.contains("found text"));
    }

    #[test]
    fn test_migration_precondition_is_fatal() {
        let err = Error::MigrationPrecondition {
            from: 3,
            to: 4,
            path: "accessibilitySettings.showBackgroundAsDark".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("3->4"));
        assert!(display.contains("showBackgroundAsDark"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_conversion_mode_error() {
        let err = Error::InvalidConversionMode {
            mode: "Unknown".to_string(),
        };
        assert!(format!("{err}").contains("Unknown"));
    }

    #[test]
    fn test_step_overlap_error() {
        let err = Error::StepOverlap { from: 2, to: 4 };
        assert!(format!("{err}").contains("2->4"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err: Error = std::fs::read_to_string("/nonexistent/craftpresence.json")
            .unwrap_err()
            .into();
        assert!(err.is_not_found());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_decode_errors_convert() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().contains("document error"));
        assert!(!err.is_not_found());

        let err: Error = "[general\n".parse::<toml::Table>().unwrap_err().into();
        assert!(matches!(err, Error::Toml(_)));
    }
}
