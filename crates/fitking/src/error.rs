//! # Site Error Types
//!
//! Configuration and session failures are recoverable and reported to the
//! caller. Effect failures do not exist; page misuse surfaces as
//! [`PageError`].

use std::path::PathBuf;

use fitking_effects::PageError;
use thiserror::Error;

/// Errors while reading site configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML is malformed or has fields of the wrong type.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors reported by an auth provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider cannot be reached.
    #[error("auth provider unavailable")]
    Unavailable,
}

/// Errors while mounting the site.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Page structure was misused.
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for site operations.
pub type SiteResult<T> = Result<T, SiteError>;
