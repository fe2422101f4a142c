//! Error types for StudentVibe Guard

use thiserror::Error;

/// Result type alias for Guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Guard error types
///
/// None of these describe a caller mistake. A denied admission or a PII
/// warning is a [`ScreenOutcome`](crate::types::ScreenOutcome), not an error.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The shared counter store could not be reached or answered garbage
    #[error("Rate limit store error: {0}")]
    StoreError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Redis error
    #[cfg(feature = "redis-store")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
