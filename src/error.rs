//! Error types for Dura
//!
//! Provides a unified error type for all archive, band and block operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DuraError
pub type Result<T> = std::result::Result<T, DuraError>;

/// Unified error type for Dura operations
#[derive(Debug, Error)]
pub enum DuraError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Naming Errors
    // -------------------------------------------------------------------------
    #[error("Invalid number format: {0:?}")]
    InvalidFormat(String),

    // -------------------------------------------------------------------------
    // Archive / Band Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not an archive: {}", .0.display())]
    NotAnArchive(PathBuf),

    #[error("Band {0} is already finished")]
    AlreadyFinished(String),

    #[error("Unsupported format version {version:?} in {}", .path.display())]
    UnsupportedVersion { path: PathBuf, version: String },

    // -------------------------------------------------------------------------
    // Block Errors
    // -------------------------------------------------------------------------
    #[error("Block {0} was never allocated by this writer")]
    BlockNotAllocated(String),

    #[error("Block payload of {size} bytes exceeds limit of {limit} bytes")]
    BlockTooLarge { size: usize, limit: usize },

    #[error("Block corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DuraError {
    fn from(e: serde_json::Error) -> Self {
        DuraError::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for DuraError {
    fn from(e: bincode::Error) -> Self {
        DuraError::Serialization(e.to_string())
    }
}
