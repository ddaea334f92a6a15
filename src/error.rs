//! Error types for SnapKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SnapError
pub type Result<T> = std::result::Result<T, SnapError>;

/// Unified error type for SnapKV operations
#[derive(Debug, Error)]
pub enum SnapError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
