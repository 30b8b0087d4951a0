//! Error types for escrow core

use thiserror::Error;

/// Escrow core error
#[derive(Debug, Error)]
pub enum Error {
    /// Amount outside the chargeable range
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
