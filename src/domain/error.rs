//! Error types for the table engine.
//!
//! This module defines the centralized error type [`TableError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The engine itself (type inference, formatting, badge colors) never fails:
//! malformed cells degrade to placeholders and failed detection degrades to
//! text. Errors are limited to configuration loading and to host-side lookups
//! that reference something the table does not know about.

use thiserror::Error;

/// The main error type for table engine operations.
///
/// # Examples
///
/// ```
/// use complete_table::TableError;
///
/// fn lookup_action(id: &str) -> Result<(), TableError> {
///     Err(TableError::UnknownAction(id.to_string()))
/// }
///
/// assert!(lookup_action("delete").is_err());
/// ```
#[derive(Debug, Error)]
pub enum TableError {
    /// Configuration is invalid or missing.
    ///
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations, typically while
    /// reading a configuration or row file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Row data could not be decoded or encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No action with the given id is declared on the table.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A row index does not address a row of the current dataset.
    #[error("Row index {index} out of range (dataset has {len} rows)")]
    RowOutOfRange {
        /// Requested row index.
        index: usize,
        /// Number of rows in the current dataset.
        len: usize,
    },
}

/// A specialized `Result` type for table engine operations.
pub type Result<T> = std::result::Result<T, TableError>;
