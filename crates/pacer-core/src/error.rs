//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface it.

use thiserror::Error;

/// The error type for `pacer-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate ({latitude}, {longitude}) is out of range")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Shorthand result type for `pacer-core`.
pub type CoreResult<T> = Result<T, CoreError>;
