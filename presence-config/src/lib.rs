#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # presence-config
//!
//! A library for loading, migrating and repairing rich-presence
//! configuration documents.
//!
//! Documents are versioned JSON trees. On load, outdated documents are
//! upgraded through a chain of schema migrations, legacy formats are
//! imported into new ones, and every stored value is checked against the
//! schema defaults for the running host.
//!
//! ## Core Types
//!
//! - [`ConfigManager`]: Load-or-create, save and apply hooks
//! - [`ConfigGraph`]: The typed configuration document
//! - [`Property`] and [`PropertyPath`]: Dynamic access by dotted path
//! - [`MigrationChain`]: Ordered schema migration steps
//! - [`Verifier`]: The verification and repair pass
//! - [`DocumentStore`]: Reading and writing the document file
//! - [`ConversionMode`]: Keycode and locale namespace conversion
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use presence_config::{ConfigGraph, Property, PropertyPath};
//!
//! let mut graph = ConfigGraph::default();
//! let path = PropertyPath::parse("advancedSettings.refreshRate");
//! assert_eq!(graph.get(&path), Some(Property::Int(2)));
//!
//! graph.set(&path, Property::Int(5)).unwrap();
//! assert_eq!(graph.advanced_settings.refresh_rate, 5);
//! ```

pub mod codes;
pub mod engine;
pub mod error;
pub mod import;
pub mod logging;
pub mod messages;
pub mod migration;
pub mod property;
pub mod schema;
pub mod settings;
pub mod store;
pub mod values;
pub mod verify;

// Re-export key types at crate root for convenience
pub use codes::ConversionMode;
pub use engine::{ConfigManager, LoadReport};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use migration::{MigrationChain, MigrationStep};
pub use property::{Dictionary, Property, PropertyPath};
pub use schema::{ConfigGraph, DEFAULT_HOST_VERSION, SCHEMA_VERSION};
pub use settings::EngineSettings;
pub use store::DocumentStore;
pub use verify::{Repair, Verifier, VerifyReport};
