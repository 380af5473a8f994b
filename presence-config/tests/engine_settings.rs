//! Integration tests for building a manager from engine settings.
//!
//! Tests that modify environment variables are marked with `#[serial]` so
//! they run sequentially; every variable is restored by an [`EnvGuard`].

mod common;

use std::env;
use std::fs;

use presence_config::settings::environment::{
    CONFIG_DIR_ENV, HOST_VERSION_ENV, MOD_ID_ENV, USER_DIR_ENV,
};
use presence_config::settings::{EngineSettings, SettingsLoader};
use presence_config::{ConfigManager, Error};
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: &'static str,
    old_value: Option<String>,
}

impl EnvGuard {
    fn new(key: &'static str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self { key, old_value }
    }

    fn remove(key: &'static str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self { key, old_value }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}

fn clear_all() -> Vec<EnvGuard> {
    [CONFIG_DIR_ENV, MOD_ID_ENV, HOST_VERSION_ENV, USER_DIR_ENV]
        .into_iter()
        .map(EnvGuard::remove)
        .collect()
}

#[test]
#[serial]
fn test_settings_file_drives_manager() {
    let _clean = clear_all();
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("presence.yaml");
    fs::write(
        &settings_path,
        format!(
            "mod_id: mymod\nconfig_dir: {}\nuser_dir: {}\nhost_version: 340\nlog_mode: quiet\n",
            dir.path().display(),
            dir.path().display()
        ),
    )
    .unwrap();

    let settings = SettingsLoader::resolve(Some(&settings_path), None).unwrap();
    let mut manager = ConfigManager::from_settings(&settings).unwrap();
    assert_eq!(manager.path(), dir.path().join("mymod.json"));
    assert_eq!(manager.host_version(), 340);

    manager.load_or_create(false).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("mymod.json")).unwrap())
            .unwrap();
    assert_eq!(raw["_lastMCVersionId"], json!(340));
    assert_eq!(raw["accessibilitySettings"]["configKeyCode"], json!(41));
}

#[test]
#[serial]
fn test_environment_overrides_settings_file() {
    let _clean = clear_all();
    let file_dir = TempDir::new().unwrap();
    let env_dir = TempDir::new().unwrap();
    let settings_path = file_dir.path().join("presence.yaml");
    fs::write(
        &settings_path,
        format!("config_dir: {}\nhost_version: 340\n", file_dir.path().display()),
    )
    .unwrap();

    let _dir = EnvGuard::new(CONFIG_DIR_ENV, &env_dir.path().display().to_string());
    let _user = EnvGuard::new(USER_DIR_ENV, &env_dir.path().display().to_string());
    let _mod_id = EnvGuard::new(MOD_ID_ENV, "envmod");
    let _host = EnvGuard::new(HOST_VERSION_ENV, "765");

    let settings = SettingsLoader::resolve(Some(&settings_path), None).unwrap();
    assert_eq!(settings.mod_id(), "envmod");
    assert_eq!(settings.host_version(), 765);

    let mut manager = ConfigManager::from_settings(&settings).unwrap();
    manager.load_or_create(false).unwrap();
    assert!(env_dir.path().join("envmod.json").exists());
    assert!(!file_dir.path().join("craftpresence.json").exists());
    assert_eq!(manager.graph().accessibility_settings.config_key_code, 96);
}

#[test]
#[serial]
fn test_environment_imports_legacy_file_for_mod() {
    let _clean = clear_all();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("envmod.properties"),
        "REFRESH_RATE=9\nRENDER_TOOLTIPS=false\n",
    )
    .unwrap();

    let _dir = EnvGuard::new(CONFIG_DIR_ENV, &dir.path().display().to_string());
    let _user = EnvGuard::new(USER_DIR_ENV, &dir.path().display().to_string());
    let _mod_id = EnvGuard::new(MOD_ID_ENV, "envmod");

    let overrides = EngineSettings {
        log_mode: Some("quiet".into()),
        ..Default::default()
    };
    let settings = SettingsLoader::resolve(None, Some(&overrides)).unwrap();
    let mut manager = ConfigManager::from_settings(&settings).unwrap();
    let report = manager.load_or_create(false).unwrap();

    assert!(report.import.unwrap().imported());
    assert_eq!(manager.graph().advanced_settings.refresh_rate, 9);
    assert!(!manager.graph().accessibility_settings.render_tooltips);
    assert!(!dir.path().join("envmod.properties").exists());
}

#[test]
#[serial]
fn test_invalid_host_version_in_environment() {
    let _clean = clear_all();
    let _host = EnvGuard::new(HOST_VERSION_ENV, "latest");

    let err = SettingsLoader::resolve(None, None).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
#[serial]
fn test_unknown_opaque_kind_is_rejected() {
    let _clean = clear_all();
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("presence.yaml");
    fs::write(&settings_path, "opaque_kinds: [color, widget]\n").unwrap();

    assert!(SettingsLoader::resolve(Some(&settings_path), None).is_err());
}
