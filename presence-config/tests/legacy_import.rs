//! Integration tests for importing legacy configurations into new documents.

mod common;

use common::{document, Fixture, MOD_ID};
use presence_config::import::{ImportOutcome, SimpleRpcOutcome};
use serde_json::json;

const PROPERTIES: &str = "\
# Legacy configuration
CLIENT_ID=555666777
SHOW_ELAPSED_TIME=false
DEBUG_MODE=true
ENABLE_PER_GUI_SYSTEM=true
CONFIG_GUI_KEYBIND=96
BIOME_MESSAGES=[default;In &BIOME&, plains;Grassy &BIOME&]
SERVER_MESSAGES=[mc.example.com;Playing &NAME&]
";

const SIMPLE_RPC: &str = r#"
[general]
version = 18
clientID = "424242"
debugging = false

[generic]
description = "Playing as %player%"
state = "%difficulty%"

[main_menu]
description = "Choosing a world"
"#;

#[test]
fn test_properties_file_is_imported_on_first_load() {
    let fixture = Fixture::new();
    let legacy = fixture.write_file(&format!("{MOD_ID}.properties"), PROPERTIES);

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    match report.import.as_ref().unwrap() {
        ImportOutcome::Properties { path, changed } => {
            assert_eq!(path, &legacy);
            assert!(*changed >= 5);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!legacy.exists());
    assert!(report.verify.is_none());

    let raw = fixture.read_document();
    assert_eq!(raw["generalSettings"]["clientId"], json!("555666777"));
    assert_eq!(raw["advancedSettings"]["debugMode"], json!(true));
    assert_eq!(raw["advancedSettings"]["enablePerGui"], json!(true));
    assert_eq!(
        raw["displaySettings"]["presenceData"]["startTimestamp"],
        json!("")
    );
    assert_eq!(
        raw["biomeSettings"]["biomeData"]["plains"]["textOverride"],
        json!("Grassy {biome.name}")
    );
    assert!(raw["serverSettings"]["serverData"].get("default").is_some());
    assert_eq!(
        raw["serverSettings"]["serverData"]["mc.example.com"]["textOverride"],
        json!("Playing {server.name}")
    );
}

#[test]
fn test_imported_document_verifies_cleanly() {
    let fixture = Fixture::new();
    fixture.write_file(&format!("{MOD_ID}.properties"), PROPERTIES);
    fixture.manager(765).load_or_create(false).unwrap();
    let imported = fixture.read_document_text();

    let report = fixture.manager(765).load_or_create(false).unwrap();
    assert!(report.import.is_none());
    assert_eq!(report.repair_count(), 0);
    assert_eq!(fixture.read_document_text(), imported);
}

#[test]
fn test_existing_document_ignores_legacy_files() {
    let fixture = Fixture::new();
    fixture.write_document(&document(765, &json!({})));
    let legacy = fixture.write_file(&format!("{MOD_ID}.properties"), PROPERTIES);

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert!(report.import.is_none());
    assert!(legacy.exists());
    assert!(!manager.graph().advanced_settings.debug_mode);
}

#[test]
fn test_simple_rpc_is_imported_when_no_properties_exist() {
    let fixture = Fixture::new();
    let toml = fixture.write_file("simple-rpc/simple-rpc.toml", SIMPLE_RPC);

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert_eq!(
        report.import,
        Some(ImportOutcome::SimpleRpc {
            dir: fixture.path().join("simple-rpc"),
            outcome: SimpleRpcOutcome::Imported { version: 18 },
        })
    );
    assert!(toml.exists());

    let graph = manager.graph();
    assert_eq!(graph.general_settings.client_id, "424242");
    assert_eq!(
        graph.display_settings.presence_data.details,
        "Playing as {player.name}"
    );
    assert_eq!(
        graph
            .status_messages
            .main_menu_data
            .data
            .as_ref()
            .unwrap()
            .details,
        "Choosing a world"
    );
    assert_eq!(
        fixture.read_document()["generalSettings"]["clientId"],
        json!("424242")
    );
}

#[test]
fn test_unsupported_simple_rpc_leaves_defaults() {
    let fixture = Fixture::new();
    fixture.write_file(
        "simple-rpc.toml",
        "[general]\nversion = 21\nclientID = \"1\"\n",
    );

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert!(!report.import.unwrap().imported());
    assert_eq!(
        manager.graph().general_settings.client_id,
        "450485984333660181"
    );
}

#[test]
fn test_broken_legacy_file_does_not_block_creation() {
    let fixture = Fixture::new();
    fixture.write_file("simple-rpc.toml", "[general\nversion =");

    let mut manager = fixture.manager(765);
    let report = manager.load_or_create(false).unwrap();
    assert!(report.created);
    assert!(report.import.is_none());
    assert!(fixture.document_path().exists());
}
