//! Error types shared across Verdant crates.

use thiserror::Error;

/// Top-level error type for Verdant operations.
#[derive(Debug, Error)]
pub enum VerdantError {
    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Verdant operations.
pub type VerdantResult<T> = Result<T, VerdantError>;
