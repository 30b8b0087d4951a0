//! Error types for the risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Data store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
