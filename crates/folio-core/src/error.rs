//! Error types for the folio core.
//!
//! This module provides a unified error type with explicit variants for
//! storage, query and input validation errors.

use thiserror::Error;

/// The unified error type for folio operations.
///
/// Every variant is local and recoverable; route handlers turn whatever
/// reaches them into an error response.
#[derive(Debug, Error)]
pub enum Error {
    /// Datastore failures (IO, corrupt records).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Query shape errors (unknown fields, stale cursors).
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Input validation errors (keys, kinds, periods).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Check if this error is a cursor that could not be resumed.
    ///
    /// Callers restart pagination from the first page when this is true.
    pub fn is_invalid_cursor(&self) -> bool {
        matches!(self, Error::Query(QueryError::InvalidCursor { .. }))
    }
}

/// Storage-level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or network IO failed.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A stored record could not be decoded.
    #[error("corrupt record at {location}: {message}")]
    Corrupt { location: String, message: String },

    /// A record could not be encoded for storage.
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::from(err))
    }
}

/// Errors raised while compiling or resuming a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The cursor does not decode, or belongs to a different query shape.
    #[error("invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    /// An order field is not a property of the kind.
    #[error("unknown order field '{field}' for {kind}")]
    UnknownOrderField { kind: String, field: String },

    /// A filter field is not a property of the kind.
    #[error("unknown filter field '{field}' for {kind}")]
    UnknownFilterField { kind: String, field: String },

    /// A filter value cannot be read as the property's type.
    #[error("invalid value '{value}' for filter '{field}': expected {expected}")]
    InvalidFilterValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid URL-safe key string.
    #[error("invalid key '{value}': {reason}")]
    Key { value: String, reason: String },

    /// Unknown record kind name.
    #[error("unknown kind '{value}'")]
    Kind { value: String },

    /// Invalid archive period.
    #[error("invalid period {year}/{month:?}")]
    Period { year: i32, month: Option<u32> },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
