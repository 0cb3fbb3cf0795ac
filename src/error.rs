//! Error types for transform operations.
//!
//! Configuration and dimension errors are reported immediately at the call
//! that violates the precondition; no partial mutation takes place. A point
//! outside the transform domain is not an error and is reported through the
//! `inside` flag of the point-query results instead.

use thiserror::Error;

/// Main error type for transform operations.
#[derive(Error, Debug)]
pub enum TransformError {
    /// An operation was called before its precondition was established,
    /// or a domain setting is itself invalid (e.g. a zero mesh-size entry).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Supplied buffers or grids do not match the geometry the current
    /// domain requires.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The requested operation is not applicable to this transform kind.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

impl TransformError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create an unsupported operation error.
    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }
}
