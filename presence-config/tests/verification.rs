//! Integration tests for the repair pass run during a load.

mod common;

use common::{document, Fixture};
use presence_config::verify::ConversionModes;
use presence_config::{ConversionMode, Repair};
use serde_json::json;

#[test]
fn test_keycode_follows_host_upgrade() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        340,
        &json!({"accessibilitySettings": {"configKeyCode": 57}}),
    ));

    let mut manager = fixture.manager(400);
    let report = manager.load_or_create(false).unwrap();
    assert_eq!(
        report.modes,
        Some(ConversionModes {
            keycode: ConversionMode::ToModern,
            locale: ConversionMode::Verify,
        })
    );
    assert_eq!(manager.graph().accessibility_settings.config_key_code, 32);
    assert_eq!(
        report.verify.unwrap().repairs,
        vec![Repair::KeycodeMigrated {
            path: "accessibilitySettings.configKeyCode".into(),
            old: 57,
            new: 32,
        }]
    );

    let raw = fixture.read_document();
    assert_eq!(raw["accessibilitySettings"]["configKeyCode"], json!(32));
    assert_eq!(raw["_lastMCVersionId"], json!(400));
}

#[test]
fn test_keycode_follows_host_downgrade() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        765,
        &json!({"accessibilitySettings": {"configKeyCode": 32}}),
    ));

    let mut manager = fixture.manager(340);
    let report = manager.load_or_create(false).unwrap();
    assert_eq!(report.modes.unwrap().keycode, ConversionMode::ToLegacy);
    assert_eq!(manager.graph().accessibility_settings.config_key_code, 57);
}

#[test]
fn test_same_host_keeps_keycode() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        765,
        &json!({"accessibilitySettings": {"configKeyCode": 32}}),
    ));

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert!(report.verify.unwrap().is_clean());
    assert_eq!(manager.graph().accessibility_settings.config_key_code, 32);
}

#[test]
fn test_unknown_keycode_is_reset() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        765,
        &json!({"accessibilitySettings": {"configKeyCode": 9999}}),
    ));

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert_eq!(
        report.verify.unwrap().reset_paths(),
        vec!["accessibilitySettings.configKeyCode"]
    );
    assert_eq!(manager.graph().accessibility_settings.config_key_code, 96);
    assert_eq!(
        fixture.read_document()["accessibilitySettings"]["configKeyCode"],
        json!(96)
    );
}

#[test]
fn test_invalid_boolean_is_reset() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        765,
        &json!({"advancedSettings": {"debugMode": "maybe", "verboseMode": "TRUE"}}),
    ));

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    let verify = report.verify.unwrap();
    assert_eq!(verify.reset_paths(), vec!["advancedSettings.debugMode"]);
    assert!(!manager.graph().advanced_settings.debug_mode);
    assert!(manager.graph().advanced_settings.verbose_mode);
}

#[test]
fn test_missing_default_entry_is_restored() {
    let fixture = Fixture::new();
    let mut raw = document(765, &json!({}));
    raw["biomeSettings"]["biomeData"] = json!({"plains": {"textOverride": "Plains"}});
    fixture.write_document(&raw);

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert!(report.verify.unwrap().iter().any(|repair| matches!(
        repair,
        Repair::MissingDefault { path, .. } if path == "biomeSettings.biomeData"
    )));

    let saved = fixture.read_document();
    assert!(saved["biomeSettings"]["biomeData"].get("default").is_some());
    assert_eq!(
        saved["biomeSettings"]["biomeData"]["plains"]["textOverride"],
        json!("Plains")
    );
}

#[test]
fn test_unknown_key_is_reported_and_dropped_on_save() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        765,
        &json!({"generalSettings": {"legacyFlag": true}}),
    ));

    let report = fixture.manager(765).load_or_create(false).unwrap();
    assert_eq!(
        report.verify.unwrap().repairs,
        vec![Repair::InvalidProperty {
            path: "generalSettings.legacyFlag".into()
        }]
    );
    assert!(fixture.read_document()["generalSettings"]
        .get("legacyFlag")
        .is_none());
}

#[test]
fn test_locale_follows_pack_format_change() {
    let fixture = Fixture::new();
    fixture.write_document(&document(
        210,
        &json!({"accessibilitySettings": {"languageId": "de_DE"}}),
    ));

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert_eq!(report.modes.unwrap().locale, ConversionMode::ToModern);
    assert_eq!(manager.graph().accessibility_settings.language_id, "de_de");
    assert!(report.verify.unwrap().iter().all(Repair::is_migration));
}
