//! Error types for the Overtime Report Engine.
//!
//! The reporting core itself never fails: aggregation is best-effort and empty
//! results are valid. These errors cover the boundaries around it, namely
//! configuration, storage, query validation and export encoding.

use thiserror::Error;

/// The main error type for the Overtime Report Engine.
///
/// # Example
///
/// ```
/// use overtime_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The record store could not be read or written.
    #[error("Storage error at '{path}': {message}")]
    StorageError {
        /// The location of the record store.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A filter parameter was malformed.
    #[error("Invalid filter '{field}': {message}")]
    InvalidFilter {
        /// The filter dimension that was rejected.
        field: String,
        /// A description of what was wrong with it.
        message: String,
    },

    /// A view position did not refer to any record.
    #[error("No record at position {index} of the current view ({len} records)")]
    RecordNotFound {
        /// The requested view position.
        index: usize,
        /// The number of records in the view.
        len: usize,
    },

    /// A positional request referred to a listing the collection has since
    /// moved past.
    #[error("The records changed since they were listed (now at revision {current})")]
    StaleView {
        /// Revision of the last listing, if any.
        listed: Option<u64>,
        /// Current revision of the collection.
        current: u64,
    },

    /// An export payload could not be produced.
    #[error("Export failed: {message}")]
    ExportError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
