//! Error types for blockfs
//!
//! Provides a unified error type for all operations.
//!
//! Validation and capacity failures are expected outcomes: the network layer
//! renders them as `ERROR:` response lines, so their `Display` output is the
//! bare message the client sees.

use thiserror::Error;

/// Result type alias using FsError
pub type Result<T> = std::result::Result<T, FsError>;

/// Unified error type for blockfs operations
#[derive(Debug, Error)]
pub enum FsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Failure opening, reading, writing, or flushing the backing store.
    /// Fatal to the current operation; never retried or rolled back.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Engine Errors (expected failures, reported to the client verbatim)
    // -------------------------------------------------------------------------
    /// Malformed or empty argument, name not found, or duplicate name.
    #[error("{0}")]
    Validation(String),

    /// No free directory slot, or no contiguous free run long enough.
    #[error("{0}")]
    Capacity(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Unknown command or wrong argument count on a request line.
    #[error("{0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Metadata Errors
    // -------------------------------------------------------------------------
    /// The persisted metadata region could not be decoded.
    #[error("Metadata corrupted: {0}")]
    Metadata(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FsError {
    /// Build a ValidationError with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        FsError::Validation(msg.into())
    }

    /// Build a CapacityError with the given message
    pub fn capacity(msg: impl Into<String>) -> Self {
        FsError::Capacity(msg.into())
    }
}
