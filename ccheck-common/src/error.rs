//! Common error types for ccheck

use thiserror::Error;

/// Common result type for ccheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ccheck crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Export requested on a session log with no rows
    #[error("Nothing to export: no checks have been logged")]
    NothingToExport,

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
