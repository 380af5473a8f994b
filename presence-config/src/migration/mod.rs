//! Ordered schema migrations.
//!
//! A [`MigrationChain`] holds steps keyed by half-open version intervals
//! `[from, to)`. Migrating a document at version `v` applies, in ascending
//! order, every step whose interval starts at the version reached so far,
//! until no step continues the chain or the target version is reached.
//!
//! Steps read old-shaped keys straight from the raw document, since the
//! typed graph no longer has fields for them, and write their results into
//! the typed graph. A step whose expected input is missing fails with
//! [`Error::MigrationPrecondition`], which aborts the load.

mod steps;
mod text_replacer;

use serde_json::Value;

pub use steps::standard_steps;
pub use text_replacer::TextReplacer;

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::messages::LogMessage;
use crate::schema::{ConfigGraph, SCHEMA_VERSION};

/// Function applying one migration step.
pub type MigrateFn = fn(&mut MigrationContext<'_>) -> Result<()>;

/// One registered step.
#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    /// First schema version the step applies to.
    pub from: i32,
    /// Schema version reached after the step.
    pub to: i32,
    /// One-line summary for logs.
    pub description: &'static str,
    /// The transformation.
    pub apply: MigrateFn,
}

impl MigrationStep {
    /// Creates a step for the interval `[from, to)`.
    #[must_use]
    pub const fn new(from: i32, to: i32, description: &'static str, apply: MigrateFn) -> Self {
        Self {
            from,
            to,
            description,
            apply,
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// What a step can see and change.
pub struct MigrationContext<'a> {
    /// The document as read from disk, before any step ran.
    pub raw: &'a Value,
    /// The typed graph being migrated.
    pub graph: &'a mut ConfigGraph,
    /// Defaults for the running host.
    pub defaults: &'a ConfigGraph,
    /// Logger for user-facing lines.
    pub logger: &'a Logger,
    from: i32,
    to: i32,
}

impl MigrationContext<'_> {
    /// Resolves a raw-document path, failing the step if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MigrationPrecondition`] naming the missing path.
    pub fn require(&self, path: &[&str]) -> Result<&Value> {
        path.iter()
            .try_fold(self.raw, |node, key| node.get(key))
            .filter(|value| !value.is_null())
            .ok_or_else(|| self.precondition(path))
    }

    /// Like [`MigrationContext::require`] for a boolean leaf.
    ///
    /// # Errors
    ///
    /// Fails when the leaf is absent or not a boolean.
    pub fn require_bool(&self, path: &[&str]) -> Result<bool> {
        let value = self.require(path)?;
        value
            .as_bool()
            .or_else(|| value.as_str().and_then(crate::values::parse_boolean))
            .ok_or_else(|| self.precondition(path))
    }

    /// Like [`MigrationContext::require`] for a scalar leaf, as text.
    ///
    /// # Errors
    ///
    /// Fails when the leaf is absent or not a scalar.
    pub fn require_text(&self, path: &[&str]) -> Result<String> {
        crate::schema::lenient::scalar_text(self.require(path)?)
            .ok_or_else(|| self.precondition(path))
    }

    /// Resolves a raw-document path without failing.
    #[must_use]
    pub fn optional(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self.raw, |node, key| node.get(key))
    }

    fn precondition(&self, path: &[&str]) -> Error {
        Error::MigrationPrecondition {
            from: self.from,
            to: self.to,
            path: path.join("."),
        }
    }
}

/// Result of running a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// `(from, to)` of every applied step, in order.
    pub applied: Vec<(i32, i32)>,
    /// Version reached.
    pub version: i32,
}

impl MigrationOutcome {
    /// True when at least one step ran.
    #[must_use]
    pub fn migrated(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Steps ordered by their starting version.
///
/// # Examples
///
/// ```
/// use presence_config::{ConfigGraph, Logger, LogLevel, MigrationChain};
/// use serde_json::json;
///
/// let chain = MigrationChain::standard();
/// let raw = json!({
///     "_schemaVersion": 5,
///     "advancedSettings": {"renderTooltips": false}
/// });
/// let mut graph = ConfigGraph::from_document(&raw).unwrap();
/// let defaults = ConfigGraph::default();
/// let outcome = chain
///     .migrate(&raw, &mut graph, &defaults, &Logger::new(LogLevel::Quiet), 5, 6)
///     .unwrap();
/// assert_eq!(outcome.applied, vec![(5, 6)]);
/// assert!(!graph.accessibility_settings.render_tooltips);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MigrationChain {
    steps: Vec<MigrationStep>,
}

impl MigrationChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in steps up to [`SCHEMA_VERSION`].
    #[must_use]
    pub fn standard() -> Self {
        Self {
            steps: standard_steps().to_vec(),
        }
    }

    /// Adds a step, keeping the chain ordered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepOverlap`] if the interval intersects a
    /// registered one, and [`Error::Validation`] if it is empty.
    pub fn register(&mut self, step: MigrationStep) -> Result<()> {
        if step.from >= step.to {
            return Err(Error::Validation {
                field: "migration step".to_string(),
                message: format!("interval [{}, {}) is empty", step.from, step.to),
            });
        }
        if self.steps.iter().any(|existing| existing.overlaps(&step)) {
            return Err(Error::StepOverlap {
                from: step.from,
                to: step.to,
            });
        }
        let index = self.steps.partition_point(|existing| existing.from < step.from);
        self.steps.insert(index, step);
        Ok(())
    }

    /// Registered steps in order.
    #[must_use]
    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Highest version the chain can reach.
    #[must_use]
    pub fn latest(&self) -> i32 {
        self.steps.last().map_or(SCHEMA_VERSION, |step| step.to)
    }

    /// Runs every applicable step from `old_version` towards `new_version`.
    ///
    /// # Errors
    ///
    /// Propagates the first step failure; steps already applied stay
    /// applied to `graph`.
    pub fn migrate(
        &self,
        raw: &Value,
        graph: &mut ConfigGraph,
        defaults: &ConfigGraph,
        logger: &Logger,
        old_version: i32,
        new_version: i32,
    ) -> Result<MigrationOutcome> {
        let mut current = old_version;
        let mut applied = Vec::new();
        if current < new_version {
            logger.emit(&LogMessage::Outdated {
                from: current,
                to: new_version,
            });
        }

        for step in &self.steps {
            if !(step.from..step.to).contains(&current) || step.to > new_version {
                continue;
            }
            log::debug!(
                "applying migration {}->{}: {}",
                step.from,
                step.to,
                step.description
            );
            let mut context = MigrationContext {
                raw,
                graph: &mut *graph,
                defaults,
                logger,
                from: step.from,
                to: step.to,
            };
            (step.apply)(&mut context)?;
            applied.push((step.from, step.to));
            current = step.to;
        }

        Ok(MigrationOutcome {
            applied,
            version: current,
        })
    }
}
