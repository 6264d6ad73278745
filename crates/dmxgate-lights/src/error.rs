//! Error types for light configuration and lookup
use dmxgate_core::GatewayError;
use thiserror::Error;

/// Light layer errors
#[derive(Error, Debug)]
pub enum LightError {
    /// I/O error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type error (including out-of-range bytes)
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration is well-formed but not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Gateway could not be created
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// No light with this name
    #[error("Unknown light: {0}")]
    UnknownLight(String),
}

/// Result type for light operations
pub type Result<T> = std::result::Result<T, LightError>;
