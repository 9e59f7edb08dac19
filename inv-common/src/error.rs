//! Common error types for inventory entry

use thiserror::Error;

/// Common result type for inventory entry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the inventory entry crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    ///
    /// Covers malformed hierarchy definitions, which are fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML file could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
