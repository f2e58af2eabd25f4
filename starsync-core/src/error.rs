//! Error types for starsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RowId;

/// All errors that can arise while loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.starsync/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// An explicitly requested config file does not exist.
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// `config init` would overwrite an existing file.
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },

    /// A required setting is absent from both the file and the environment.
    #[error("missing required setting `{key}` (set it in the config file or via ${env})")]
    MissingKey {
        key: &'static str,
        env: &'static str,
    },

    /// A setting is present but cannot be interpreted.
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors surfaced by a destination-table transport.
///
/// Every variant names the operation that failed so a run can be diagnosed
/// from the message alone.
#[derive(Debug, Error)]
pub enum TableError {
    /// The service answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("{operation} failed: {message}")]
    Transport { operation: String, message: String },

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response to {operation}: {message}")]
    Decode { operation: String, message: String },

    /// A write addressed a row the table does not (or no longer) contain.
    #[error("row {0} not found")]
    RowNotFound(RowId),

    /// A configured field name is not a column of the table.
    #[error("field `{field}` is not a column of the table")]
    UnknownField { field: String },

    /// The column exists but its type cannot hold plain text.
    #[error("field `{field}` has type `{kind}`, which starsync cannot write")]
    UnsupportedField { field: String, kind: String },

    /// The table locator could not be turned into a table id.
    #[error("invalid table locator `{0}`")]
    InvalidLocator(String),
}
