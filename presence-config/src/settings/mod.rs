//! Settings of the engine itself.
//!
//! These control where the managed document lives and how the
//! verification pass routes leaves. They never appear in the document.
//!
//! # Precedence
//!
//! Highest to lowest:
//!
//! 1. Environment variables (`PRESENCE_CONFIG_*`)
//! 2. Programmatic overrides passed to [`SettingsLoader::resolve`]
//! 3. The YAML settings file
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use presence_config::settings::{EngineSettings, SettingsValidator};
//!
//! let settings: EngineSettings =
//!     serde_yaml::from_str("mod_id: demo\nhost_version: 340\n").unwrap();
//! SettingsValidator::validate(&settings).unwrap();
//! assert_eq!(settings.verify_options().unwrap().host_version, 340);
//! ```

pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use environment::EnvironmentSettings;
pub use loader::SettingsLoader;
pub use merger::SettingsMerger;
pub use schema::EngineSettings;
pub use validator::SettingsValidator;
