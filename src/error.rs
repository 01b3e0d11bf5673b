//! Common error types for mbgap

use thiserror::Error;

/// Common result type for mbgap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or query term
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
