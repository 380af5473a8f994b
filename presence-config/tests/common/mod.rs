//! Common test utilities for integration tests.
//!
//! Every fixture owns a temporary directory that serves as both the
//! configuration directory and the game instance directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use presence_config::import::ImportSources;
use presence_config::{ConfigGraph, ConfigManager, DocumentStore, LogLevel, Logger};

/// Mod identifier used by all fixtures.
pub const MOD_ID: &str = "craftpresence";

/// A temporary configuration directory.
pub struct Fixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// The configuration directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Location of the managed document.
    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join(format!("{MOD_ID}.json"))
    }

    /// A quiet manager for `host_version`.
    pub fn manager(&self, host_version: i32) -> ConfigManager {
        ConfigManager::new(
            DocumentStore::new(self.document_path()),
            ImportSources::new(self.path(), self.path(), MOD_ID),
            host_version,
            Logger::new(LogLevel::Quiet),
        )
    }

    /// Writes `document` as the managed document.
    pub fn write_document(&self, document: &Value) {
        fs::write(
            self.document_path(),
            serde_json::to_string_pretty(document).unwrap(),
        )
        .unwrap();
    }

    /// Reads the managed document as raw JSON.
    pub fn read_document(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(self.document_path()).unwrap()).unwrap()
    }

    /// Reads the managed document as text.
    pub fn read_document_text(&self) -> String {
        fs::read_to_string(self.document_path()).unwrap()
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }
}

/// The default document for `host_version` with `patch` merged over it.
#[allow(dead_code)]
pub fn document(host_version: i32, patch: &Value) -> Value {
    let mut base = ConfigGraph::defaults(host_version).to_document().unwrap();
    merge(&mut base, patch);
    base
}

fn merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
