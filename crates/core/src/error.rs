//! Error types for the shootout harness
//!
//! Every failure in this domain is a programmer error in matrix assembly
//! or an I/O failure of the result sink; nothing here is retryable.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for shootout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the shootout harness
#[derive(Debug, Error)]
pub enum Error {
    /// A miss workload was given a different-key set whose cardinality does
    /// not match the population key set
    #[error("key count mismatch: expected {expected} different keys, got {actual}")]
    KeyCountMismatch {
        /// Size of the population key set
        expected: usize,
        /// Size of the different-key set supplied
        actual: usize,
    },

    /// A required collaborator was not supplied
    #[error("missing required dependency: {0}")]
    MissingDependency(&'static str),

    /// Two container implementations share a name within one run
    #[error("duplicate container implementation: {0}")]
    DuplicateImplementation(String),

    /// A configured implementation name is not in the catalog
    #[error("unknown container implementation: {0}")]
    UnknownImplementation(String),

    /// Configuration values are out of range or inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigParse(String),

    /// The result sink rejected a row
    #[error("result sink error: {0}")]
    Sink(String),

    /// I/O error (output file, config file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an `InvalidConfig` error from anything displayable
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
