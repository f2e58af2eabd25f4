//! starsync core library — domain types, the table interface, configuration, errors.
//!
//! - [`types`] — stars, table rows, field names, newtypes
//! - [`table`] — the [`Table`] capability the reconciler writes through
//! - [`memory`] — an in-memory [`Table`]
//! - [`config`] — YAML + environment configuration
//! - [`error`] — [`ConfigError`], [`TableError`]

pub mod config;
pub mod error;
pub mod memory;
pub mod table;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, TableError};
pub use table::Table;
pub use types::{FieldNames, Fields, RowId, Secret, StarRecord, TableRow};
