//! Error types for the gateway
use thiserror::Error;

/// Gateway errors
///
/// Rejected channel writes are not errors; they are reported through the
/// return values of the write operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The destination could not be parsed or resolved
    #[error("Invalid Art-Net target: {0}")]
    InvalidTarget(String),

    /// I/O error (socket creation or frame transmission)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
