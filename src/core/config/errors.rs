//! Configuration error types and validation traits.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A thread count of zero was requested.
    #[error("{field} must be greater than 0")]
    InvalidThreadCount { field: &'static str },

    /// A configuration file does not exist or could not be read.
    #[error("failed to read configuration file {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration document")]
    Parse(#[from] serde_json::Error),

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates an optional thread count.
    ///
    /// `None` means "let the engine decide" and is always valid.
    fn validate_thread_count(
        &self,
        field: &'static str,
        threads: Option<usize>,
    ) -> Result<(), ConfigError> {
        match threads {
            Some(0) => Err(ConfigError::InvalidThreadCount { field }),
            _ => Ok(()),
        }
    }
}
