//! Imports from configuration formats that predate the JSON document.
//!
//! Imports only run while a new document is being created. A legacy
//! properties file of the same mod takes precedence; otherwise the first
//! SimpleRPC installation found is converted.

pub mod properties;
pub mod simple_rpc;

use std::path::{Path, PathBuf};

pub use properties::{PropertiesFile, PropertiesImport};
pub use simple_rpc::{SimpleRpcImport, SimpleRpcOutcome, SimpleRpcSource};

use crate::error::Result;
use crate::logging::Logger;
use crate::schema::ConfigGraph;

/// Directories searched for legacy files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSources {
    /// Directory holding the document and the legacy properties file.
    pub config_dir: PathBuf,
    /// Game instance directory.
    pub user_dir: PathBuf,
    /// Mod identifier naming the properties file.
    pub mod_id: String,
}

/// What [`import_legacy`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No legacy files were found.
    Nothing,
    /// A properties file was imported and removed.
    Properties {
        /// Location of the former file.
        path: PathBuf,
        /// Number of properties changed.
        changed: usize,
    },
    /// A SimpleRPC installation was examined.
    SimpleRpc {
        /// Directory of the installation.
        dir: PathBuf,
        /// Whether anything was imported.
        outcome: SimpleRpcOutcome,
    },
}

impl ImportOutcome {
    /// True when settings were taken from a legacy file.
    #[must_use]
    pub fn imported(&self) -> bool {
        match self {
            Self::Nothing => false,
            Self::Properties { .. } => true,
            Self::SimpleRpc { outcome, .. } => {
                matches!(outcome, SimpleRpcOutcome::Imported { .. })
            }
        }
    }
}

impl ImportSources {
    /// Sources below `config_dir` and `user_dir` for `mod_id`.
    pub fn new(config_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>, mod_id: &str) -> Self {
        Self {
            config_dir: config_dir.into(),
            user_dir: user_dir.into(),
            mod_id: mod_id.to_string(),
        }
    }

    /// Location of the legacy properties file.
    #[must_use]
    pub fn properties_path(&self) -> PathBuf {
        PropertiesImport::locate(&self.config_dir, &self.mod_id)
    }

    fn simple_rpc(&self) -> Option<SimpleRpcSource> {
        SimpleRpcSource::probe(&self.config_dir, &self.user_dir)
    }
}

/// Imports the first legacy configuration found into `graph`.
///
/// # Examples
///
/// ```
/// use presence_config::import::{import_legacy, ImportOutcome, ImportSources};
/// use presence_config::{ConfigGraph, LogLevel, Logger};
///
/// let dir = tempfile::tempdir().unwrap();
/// let sources = ImportSources::new(dir.path(), dir.path(), "craftpresence");
/// let mut graph = ConfigGraph::default();
/// let outcome = import_legacy(&sources, &mut graph, &Logger::new(LogLevel::Quiet)).unwrap();
/// assert_eq!(outcome, ImportOutcome::Nothing);
/// ```
///
/// # Errors
///
/// Returns an error if a legacy file exists but cannot be read or parsed.
pub fn import_legacy(
    sources: &ImportSources,
    graph: &mut ConfigGraph,
    logger: &Logger,
) -> Result<ImportOutcome> {
    let properties = sources.properties_path();
    if properties.is_file() {
        let changed = PropertiesImport::new(&properties).apply(graph, logger)?;
        return Ok(ImportOutcome::Properties {
            path: properties,
            changed,
        });
    }

    let Some(source) = sources.simple_rpc() else {
        log::debug!("no legacy configuration below {}", sources.config_dir.display());
        return Ok(ImportOutcome::Nothing);
    };
    let dir = source.dir.clone();
    let outcome = SimpleRpcImport::new(source).apply(graph, logger)?;
    Ok(ImportOutcome::SimpleRpc { dir, outcome })
}

/// True if any legacy file exists for `sources`.
#[must_use]
pub fn has_legacy_files(sources: &ImportSources) -> bool {
    sources.properties_path().is_file() || sources.simple_rpc().is_some()
}

/// The directory an [`ImportOutcome`] read from, if any.
#[must_use]
pub fn source_path(outcome: &ImportOutcome) -> Option<&Path> {
    match outcome {
        ImportOutcome::Nothing => None,
        ImportOutcome::Properties { path, .. } => Some(path.as_path()),
        ImportOutcome::SimpleRpc { dir, .. } => Some(dir.as_path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> Logger {
        Logger::new(LogLevel::Quiet)
    }

    #[test]
    fn test_properties_take_precedence() {
        let dir = TempDir::new().unwrap();
        let sources = ImportSources::new(dir.path(), dir.path(), "demo");
        fs::write(sources.properties_path(), "VERBOSE_MODE=true\n").unwrap();
        fs::write(
            dir.path().join(simple_rpc::SIMPLE_RPC_FILE),
            "[general]\nversion = 18\nclientID = \"1\"\n",
        )
        .unwrap();
        assert!(has_legacy_files(&sources));

        let mut graph = ConfigGraph::default();
        let outcome = import_legacy(&sources, &mut graph, &quiet()).unwrap();
        assert!(outcome.imported());
        assert!(matches!(outcome, ImportOutcome::Properties { changed: 1, .. }));
        assert!(graph.advanced_settings.verbose_mode);
        assert_ne!(graph.general_settings.client_id, "1");
        assert_eq!(source_path(&outcome), Some(sources.properties_path().as_path()));
    }

    #[test]
    fn test_simple_rpc_when_no_properties() {
        let config = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let rpc_dir = user.path().join(simple_rpc::SIMPLE_RPC_DIR);
        fs::create_dir_all(&rpc_dir).unwrap();
        fs::write(
            rpc_dir.join(simple_rpc::SIMPLE_RPC_FILE),
            "[general]\nversion = 20\n",
        )
        .unwrap();

        let sources = ImportSources::new(config.path(), user.path(), "demo");
        let mut graph = ConfigGraph::default();
        let outcome = import_legacy(&sources, &mut graph, &quiet()).unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::SimpleRpc {
                dir: rpc_dir,
                outcome: SimpleRpcOutcome::Unsupported { version: 20 },
            }
        );
        assert!(!outcome.imported());
    }
}
