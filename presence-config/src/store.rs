//! Reading and writing the configuration document.
//!
//! The document is pretty-printed UTF-8 JSON with non-ASCII characters
//! written as-is. Writes go to a temporary file in the same directory which
//! then replaces the document, so a crash never leaves a half-written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::schema::ConfigGraph;

/// Suffix appended to an unreadable document before it is replaced.
pub const BACKUP_SUFFIX: &str = "bak";

/// A decoded document together with the raw JSON it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Typed graph.
    pub graph: ConfigGraph,
    /// The document as parsed, before any repair.
    pub raw: Value,
}

/// The single document file an engine manages.
///
/// # Examples
///
/// ```
/// use presence_config::{ConfigGraph, DocumentStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = DocumentStore::new(dir.path().join("craftpresence.json"));
/// assert!(store.try_read().unwrap().is_none());
///
/// store.write(&ConfigGraph::default()).unwrap();
/// let stored = store.try_read().unwrap().unwrap();
/// assert_eq!(stored.graph, ConfigGraph::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    /// A store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the document file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Location used when the document is moved aside.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Reads the raw document. `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read_raw(&self) -> Result<Option<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Reads and decodes the document. `Ok(None)` when the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or its root
    /// is not an object.
    pub fn try_read(&self) -> Result<Option<StoredDocument>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(None);
        };
        let graph = ConfigGraph::from_document(&raw)?;
        Ok(Some(StoredDocument { graph, raw }))
    }

    /// Reads the document, treating any failure like a missing file.
    ///
    /// A failure other than not-found is logged and the offending file is
    /// renamed to [`DocumentStore::backup_path`] so the next write does not
    /// destroy it.
    pub fn read(&self, logger: &Logger) -> Option<StoredDocument> {
        match self.try_read() {
            Ok(document) => document,
            Err(err) => {
                logger.emit(&LogMessage::ReadFailed {
                    path: self.path.clone(),
                    reason: err.to_string(),
                });
                self.back_up(logger);
                None
            }
        }
    }

    fn back_up(&self, logger: &Logger) {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => logger.emit(&LogMessage::BackedUp {
                path: self.path.clone(),
                backup,
            }),
            Err(err) => logger.warn(&format!(
                "Could not back up {}: {err}",
                self.path.display()
            )),
        }
    }

    /// Writes `graph`, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be encoded or the file cannot
    /// be written.
    pub fn write(&self, graph: &ConfigGraph) -> Result<()> {
        let contents = serde_json::to_string_pretty(&graph.to_document()?)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}
