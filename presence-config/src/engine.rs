//! The configuration manager.
//!
//! [`ConfigManager`] owns the document store and the in-memory graph. A load
//! reads the document (or starts from defaults), brings it up to the current
//! schema through a legacy import or the migration chain, verifies it for
//! the running host, and saves the result.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::import::{has_legacy_files, import_legacy, source_path, ImportOutcome, ImportSources};
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::migration::{MigrationChain, MigrationOutcome};
use crate::schema::{ConfigGraph, SCHEMA_VERSION};
use crate::settings::EngineSettings;
use crate::store::{DocumentStore, StoredDocument};
use crate::verify::{ConversionModes, Verifier, VerifyOptions, VerifyReport};

type ApplyHook = Box<dyn FnMut(&ConfigGraph)>;
type ApplyFromHook = Box<dyn FnMut(&ConfigGraph, &ConfigGraph)>;

/// What a call to [`ConfigManager::load_or_create`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The graph was created from defaults.
    pub created: bool,
    /// An existing document was discarded as invalid.
    pub discarded: bool,
    /// The document was written back.
    pub saved: bool,
    /// Host version recorded in the document before this load.
    pub previous_host_version: i32,
    /// Conversion modes used for verification.
    pub modes: Option<ConversionModes>,
    /// Result of the legacy import, for new documents.
    pub import: Option<ImportOutcome>,
    /// Result of the migration chain, for outdated documents.
    pub migration: Option<MigrationOutcome>,
    /// Findings of the verification pass, for existing documents.
    pub verify: Option<VerifyReport>,
    /// The apply-settings hook fired.
    pub applied: bool,
}

impl LoadReport {
    /// Number of repairs made by verification.
    #[must_use]
    pub fn repair_count(&self) -> usize {
        self.verify.as_ref().map_or(0, VerifyReport::len)
    }

    /// True if any migration step ran.
    #[must_use]
    pub fn migrated(&self) -> bool {
        self.migration
            .as_ref()
            .is_some_and(MigrationOutcome::migrated)
    }
}

/// Loads, repairs and persists one configuration document.
///
/// # Examples
///
/// ```
/// use presence_config::import::ImportSources;
/// use presence_config::{ConfigManager, DocumentStore, LogLevel, Logger};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = DocumentStore::new(dir.path().join("craftpresence.json"));
/// let sources = ImportSources::new(dir.path(), dir.path(), "craftpresence");
/// let mut manager = ConfigManager::new(store, sources, 765, Logger::new(LogLevel::Quiet));
///
/// let report = manager.load_or_create(false).unwrap();
/// assert!(report.created);
/// assert!(manager.store().exists());
///
/// let report = manager.load_or_create(false).unwrap();
/// assert!(!report.created);
/// assert!(report.verify.unwrap().is_clean());
/// ```
pub struct ConfigManager {
    store: DocumentStore,
    sources: ImportSources,
    chain: MigrationChain,
    verifier: Verifier,
    defaults: ConfigGraph,
    graph: ConfigGraph,
    host_version: i32,
    logger: Logger,
    on_apply: Option<ApplyHook>,
    on_apply_from: Option<ApplyFromHook>,
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("store", &self.store)
            .field("sources", &self.sources)
            .field("host_version", &self.host_version)
            .field("schema_version", &self.graph.schema_version)
            .finish_non_exhaustive()
    }
}

impl ConfigManager {
    /// A manager with the standard migration chain and default verification
    /// options for `host_version`.
    #[must_use]
    pub fn new(
        store: DocumentStore,
        sources: ImportSources,
        host_version: i32,
        logger: Logger,
    ) -> Self {
        let defaults = ConfigGraph::defaults(host_version);
        Self {
            store,
            sources,
            chain: MigrationChain::standard(),
            verifier: Verifier::new(VerifyOptions {
                host_version,
                ..VerifyOptions::default()
            }),
            graph: defaults.copy(),
            defaults,
            host_version,
            logger,
            on_apply: None,
            on_apply_from: None,
        }
    }

    /// A manager configured from resolved engine settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be determined or the
    /// verification options are invalid.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self> {
        let store = DocumentStore::new(settings.document_path()?);
        let sources = ImportSources::new(
            settings.config_dir()?,
            settings.user_dir()?,
            settings.mod_id(),
        );
        let manager = Self::new(store, sources, settings.host_version(), settings.logger())
            .with_verifier(Verifier::new(settings.verify_options()?));
        Ok(manager)
    }

    /// Replaces the migration chain.
    #[must_use]
    pub fn with_chain(mut self, chain: MigrationChain) -> Self {
        self.chain = chain;
        self
    }

    /// Replaces the verifier.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// The document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// The current graph.
    #[must_use]
    pub fn graph(&self) -> &ConfigGraph {
        &self.graph
    }

    /// Mutable access to the current graph. Callers that change settings
    /// should set [`ConfigGraph::has_changed`].
    pub fn graph_mut(&mut self) -> &mut ConfigGraph {
        &mut self.graph
    }

    /// The defaults for the running host.
    #[must_use]
    pub fn defaults(&self) -> &ConfigGraph {
        &self.defaults
    }

    /// Host version the manager runs under.
    #[must_use]
    pub fn host_version(&self) -> i32 {
        self.host_version
    }

    /// Registers the hook fired by [`ConfigManager::apply_settings`].
    pub fn on_apply_settings(&mut self, hook: impl FnMut(&ConfigGraph) + 'static) {
        self.on_apply = Some(Box::new(hook));
    }

    /// Registers the hook fired by [`ConfigManager::apply_from`] with the
    /// current and the previous graph.
    pub fn on_apply_from(&mut self, hook: impl FnMut(&ConfigGraph, &ConfigGraph) + 'static) {
        self.on_apply_from = Some(Box::new(hook));
    }

    /// Fires the apply-settings hook with the current graph.
    pub fn apply_settings(&mut self) {
        if let Some(hook) = self.on_apply.as_mut() {
            hook(&self.graph);
        }
    }

    /// Fires the apply-from hook with the current graph and `old`.
    pub fn apply_from(&mut self, old: &ConfigGraph) {
        if let Some(hook) = self.on_apply_from.as_mut() {
            hook(&self.graph, old);
        }
    }

    /// Applies and clears pending changes. Returns true if the hook fired.
    pub fn apply_changes(&mut self) -> bool {
        if !self.graph.has_changed {
            return false;
        }
        self.apply_settings();
        self.graph.has_changed = false;
        true
    }

    /// Writes the current graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn save(&self) -> Result<()> {
        self.store.write(&self.graph)
    }

    /// Reads the document, or creates it from defaults, and brings it up to
    /// date.
    ///
    /// With `force_create` an existing document is replaced by defaults in
    /// memory and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration step fails or the document cannot be
    /// written. An unreadable document is not an error: it is backed up and
    /// replaced by defaults.
    pub fn load_or_create(&mut self, force_create: bool) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let stored = self.store.read(&self.logger);

        let raw = match stored {
            Some(StoredDocument { graph, raw })
                if !force_create && graph.schema_version > 0 && graph.last_host_version > 0 =>
            {
                self.graph = graph;
                Some(raw)
            }
            stored => {
                let is_invalid = stored.is_some();
                log::debug!(
                    "starting from defaults (existing document discarded: {is_invalid})"
                );
                self.graph = self.defaults.copy();
                self.graph.is_new_file = true;
                self.graph.has_changed = is_invalid;
                report.created = true;
                report.discarded = is_invalid;
                None
            }
        };

        self.sync(raw, &mut report)?;

        if !force_create {
            self.save()?;
            report.saved = true;
            let path = self.store.path().to_path_buf();
            if self.graph.is_new_file {
                self.logger.emit(&LogMessage::NewFile { path });
            } else {
                self.logger.emit(&LogMessage::Saved { path });
            }
        }

        report.applied = self.apply_changes();
        Ok(report)
    }

    fn sync(&mut self, raw: Option<serde_json::Value>, report: &mut LoadReport) -> Result<()> {
        let mut raw = raw;

        if self.graph.is_new_file {
            report.import = self.import();
        } else if self.graph.schema_version != SCHEMA_VERSION {
            if let Some(document) = raw.as_ref() {
                let from = self.graph.schema_version;
                let outcome = self.chain.migrate(
                    document,
                    &mut self.graph,
                    &self.defaults,
                    &self.logger,
                    from,
                    SCHEMA_VERSION,
                )?;
                report.migration = Some(outcome);
            }
        }

        let migrated = report.migrated();
        self.graph.schema_version = SCHEMA_VERSION;

        let old_host = self.graph.last_host_version;
        report.previous_host_version = old_host;
        self.graph.last_host_version = self.host_version;

        if migrated {
            self.save()?;
            raw = self.store.read_raw()?;
        }

        if self.graph.is_new_file {
            return Ok(());
        }

        let modes = ConversionModes::between(old_host, self.host_version);
        log::debug!(
            "verifying with keycode mode {} and locale mode {}",
            modes.keycode,
            modes.locale
        );
        report.modes = Some(modes);
        if let Some(document) = raw.as_ref() {
            report.verify = Some(self.verifier.verify(
                document,
                &mut self.graph,
                &self.defaults,
                modes,
                &self.logger,
            )?);
        }
        Ok(())
    }

    fn import(&mut self) -> Option<ImportOutcome> {
        if !has_legacy_files(&self.sources) {
            return Some(ImportOutcome::Nothing);
        }
        match import_legacy(&self.sources, &mut self.graph, &self.logger) {
            Ok(outcome) => {
                if let Some(source) = source_path(&outcome) {
                    log::debug!("legacy configuration read from {}", source.display());
                }
                Some(outcome)
            }
            Err(err) => {
                self.logger
                    .warn(&format!("Legacy configuration could not be imported: {err}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::verify::Repair;
    use serde_json::json;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir, host_version: i32) -> ConfigManager {
        let store = DocumentStore::new(dir.path().join("craftpresence.json"));
        let sources = ImportSources::new(dir.path(), dir.path(), "craftpresence");
        ConfigManager::new(store, sources, host_version, Logger::new(LogLevel::Quiet))
    }

    fn write_document(manager: &ConfigManager, document: &serde_json::Value) {
        fs::write(
            manager.path(),
            serde_json::to_string_pretty(document).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_fresh_load_creates_defaults() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        let report = manager.load_or_create(false).unwrap();

        assert!(report.created);
        assert!(!report.discarded);
        assert!(report.saved);
        assert!(report.verify.is_none());
        assert_eq!(report.import, Some(ImportOutcome::Nothing));
        assert!(manager.graph().is_new_file);
        assert!(!report.applied);

        let stored = manager.store().try_read().unwrap().unwrap();
        assert_eq!(stored.graph.schema_version, SCHEMA_VERSION);
        assert_eq!(stored.graph.last_host_version, 765);
    }

    #[test]
    fn test_reload_is_stable() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        manager.load_or_create(false).unwrap();
        let first = fs::read_to_string(manager.path()).unwrap();

        let report = manager.load_or_create(false).unwrap();
        assert!(!report.created);
        assert!(report.verify.unwrap().is_clean());
        assert_eq!(fs::read_to_string(manager.path()).unwrap(), first);
    }

    #[test]
    fn test_force_create_does_not_write() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        let report = manager.load_or_create(true).unwrap();
        assert!(report.created);
        assert!(!report.saved);
        assert!(!manager.store().exists());
    }

    #[test]
    fn test_invalid_metadata_discards_document_and_applies() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        write_document(
            &manager,
            &json!({"_schemaVersion": 0, "_lastMCVersionId": 765,
                    "advancedSettings": {"debugMode": true}}),
        );

        let applied = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&applied);
        manager.on_apply_settings(move |_| *counter.borrow_mut() += 1);

        let report = manager.load_or_create(false).unwrap();
        assert!(report.created);
        assert!(report.discarded);
        assert!(report.applied);
        assert_eq!(*applied.borrow(), 1);
        assert!(!manager.graph().has_changed);
        assert!(!manager.graph().advanced_settings.debug_mode);
    }

    #[test]
    fn test_outdated_document_is_migrated() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        let mut document = ConfigGraph::defaults(765).to_document().unwrap();
        document["_schemaVersion"] = json!(5);
        document["advancedSettings"]["renderTooltips"] = json!(false);
        write_document(&manager, &document);

        let report = manager.load_or_create(false).unwrap();
        assert!(report.migrated());
        assert_eq!(report.migration.as_ref().unwrap().applied, vec![(5, 6)]);
        assert!(!manager.graph().accessibility_settings.render_tooltips);
        // The relocated key is gone after the intermediate save.
        assert!(report
            .verify
            .unwrap()
            .iter()
            .all(|repair| !matches!(repair, Repair::InvalidProperty { .. })));

        let stored = manager.store().try_read().unwrap().unwrap();
        assert_eq!(stored.graph.schema_version, SCHEMA_VERSION);
        assert!(stored.raw["advancedSettings"].get("renderTooltips").is_none());
    }

    #[test]
    fn test_host_upgrade_migrates_keycode() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        let mut document = ConfigGraph::defaults(340).to_document().unwrap();
        document["accessibilitySettings"]["configKeyCode"] = json!(57);
        write_document(&manager, &document);

        let report = manager.load_or_create(false).unwrap();
        assert_eq!(report.previous_host_version, 340);
        assert_eq!(manager.graph().accessibility_settings.config_key_code, 32);
        assert_eq!(manager.graph().last_host_version, 765);
        assert!(report
            .verify
            .unwrap()
            .iter()
            .any(|repair| matches!(repair, Repair::KeycodeMigrated { old: 57, new: 32, .. })));
    }

    #[test]
    fn test_unreadable_document_is_replaced() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        fs::write(manager.path(), "{ broken").unwrap();

        let report = manager.load_or_create(false).unwrap();
        assert!(report.created);
        assert!(!report.discarded);
        assert!(manager.store().exists());
        assert_eq!(
            fs::read_to_string(manager.store().backup_path()).unwrap(),
            "{ broken"
        );
    }

    #[test]
    fn test_new_document_imports_legacy_properties() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        let legacy = dir.path().join("craftpresence.properties");
        fs::write(&legacy, "DEBUG_MODE=true\n").unwrap();

        let report = manager.load_or_create(false).unwrap();
        let outcome = report.import.unwrap();
        assert!(outcome.imported());
        assert_eq!(source_path(&outcome), Some(legacy.as_path()));
        assert!(manager.graph().advanced_settings.debug_mode);
        assert!(!legacy.exists());

        let stored = manager.store().try_read().unwrap().unwrap();
        assert!(stored.graph.advanced_settings.debug_mode);
    }

    #[test]
    fn test_apply_from_receives_both_graphs() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        manager.load_or_create(false).unwrap();

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        manager.on_apply_from(move |current, old| {
            *sink.borrow_mut() = Some((
                current.advanced_settings.refresh_rate,
                old.advanced_settings.refresh_rate,
            ));
        });

        let old = manager.graph().copy();
        manager.graph_mut().advanced_settings.refresh_rate = 7;
        manager.apply_from(&old);
        assert_eq!(*seen.borrow(), Some((7, 2)));
    }

    #[test]
    fn test_apply_changes_only_when_flagged() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir, 765);
        manager.load_or_create(false).unwrap();
        assert!(!manager.apply_changes());

        manager.graph_mut().has_changed = true;
        assert!(manager.apply_changes());
        assert!(!manager.graph().has_changed);
    }
}
